//! Session engine driving the full client lifecycle.
//!
//! Two cooperating loops share the session cache and a running flag:
//!
//! - The input loop (main thread) reads lines from the terminal, parses
//!   them against the verb table, and publishes user intents on the bus.
//! - The receive loop (background thread) polls the subscriber under its
//!   bounded timeout and reconciles inbound messages into the cache.
//!
//! Shutdown is cooperative: `exit`, Ctrl+C, or EOF clears the flag; the
//! receive loop notices within one receive timeout and the input loop
//! joins it before returning. Recoverable errors are printed or logged and
//! the loops continue; only conditions escaping both loops reach `main`.
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::{error, info, warn};
use tickr_common::message::Message;
use tickr_common::net::addr;
use tickr_common::symbol::is_valid_symbol_format;
use tickr_common::{Result, TickrError};

use crate::args::Args;
use crate::bus::{BusEndpoint, BusReceiver, MessageSender};
use crate::command::{self, CommandLine, ParseOutcome, Verb};
use crate::currency::CurrencyService;
use crate::render;
use crate::state::Session;

/// Pause between receive polls; caps CPU use, not a correctness knob.
const POLL_PAUSE_MS: u64 = 10;
/// Bounded window for the service to attach before the replay request.
const STARTUP_WAIT_MS: u64 = 1000;

/// The interactive client application.
pub struct CliApp {
    sender: MessageSender,
    receiver: Option<BusReceiver>,
    session: Arc<Mutex<Session>>,
    fx: CurrencyService,
    running: Arc<AtomicBool>,
}

impl CliApp {
    /// Open both bus directions, wait for the service to attach, and ask it
    /// to replay the persisted subscription set.
    pub fn connect(args: &Args) -> Result<Self> {
        let (sender, receiver) = BusEndpoint::open(
            &addr("0.0.0.0", args.publish_port),
            &addr(&args.service_host, args.service_port),
        )?;
        info!("Intent publisher bound on: {}", sender.local_addr()?);

        if sender.wait_for_service(Duration::from_millis(STARTUP_WAIT_MS))? {
            info!("DataService attached as subscriber");
        } else {
            warn!("No subscriber attached yet; the service may still be starting");
        }

        let app = CliApp {
            sender,
            receiver: Some(receiver),
            session: Arc::new(Mutex::new(Session::new())),
            fx: CurrencyService::new(),
            running: Arc::new(AtomicBool::new(true)),
        };
        app.publish(Message::request_subscriptions());
        Ok(app)
    }

    /// Shared handle to the running flag, for signal handlers.
    pub fn running_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Run the input loop on the calling thread and the receive loop on a
    /// second one; returns once both have quiesced.
    pub fn run(mut self) -> Result<()> {
        let mut receiver = self.receiver.take().ok_or_else(|| {
            TickrError::TransportFailed(String::from("receive loop already started"))
        })?;
        let update_thread = {
            let sender = self.sender.clone();
            let session = Arc::clone(&self.session);
            let fx = self.fx.clone();
            let running = Arc::clone(&self.running);
            thread::spawn(move || {
                receive_loop(&mut receiver, &sender, &session, &fx, &running);
            })
        };

        while self.running.load(Ordering::Relaxed) {
            print!("\n> ");
            io::stdout().flush()?;

            let mut input = String::new();
            match io::stdin().read_line(&mut input) {
                Ok(0) => {
                    // stdin closed; treat like `exit`.
                    self.running.store(false, Ordering::SeqCst);
                }
                Ok(_) => {
                    let line = input.trim();
                    if !line.is_empty() {
                        self.handle_command(line);
                    }
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    self.running.store(false, Ordering::SeqCst);
                }
            }
        }

        if update_thread.join().is_err() {
            error!("Receive loop terminated abnormally");
        }
        Ok(())
    }

    fn handle_command(&self, line: &str) {
        match command::parse(line) {
            ParseOutcome::Empty => {}
            ParseOutcome::UnknownVerb(verb) => {
                warn!("Unknown command: {}", verb);
                println!("Type 'help' for available commands and safety tips.");
            }
            ParseOutcome::MissingArgument(usage) => warn!("{}", usage),
            ParseOutcome::Command(cmd) => self.dispatch(cmd),
        }
    }

    fn dispatch(&self, cmd: CommandLine) {
        let argument = cmd.argument.as_deref().unwrap_or_default();
        match cmd.verb {
            Verb::Subscribe => self.subscribe(argument),
            Verb::Unsubscribe => self.unsubscribe(argument),
            Verb::Query => self.query(argument),
            Verb::Graph => self.graph(argument),
            Verb::History => self.request_price_history(argument),
            Verb::List => self.list_stocks(),
            Verb::Help => {
                print!("{}", render::help_text());
                print!("{}", render::safety_tips());
            }
            Verb::Clear => self.clear_screen(),
            Verb::Currency => self.set_currency(argument),
            Verb::Exit => self.stop(),
        }
    }

    // Commands
    // --------------------------------------------
    fn subscribe(&self, symbol: &str) {
        if !self.validated(symbol) {
            return;
        }
        if confirm_action("subscribe to", symbol) {
            self.publish(Message::subscribe(symbol));
            info!("Subscribing to {}", symbol);
        }
    }

    /// Sends the unsubscribe intent and forgets the symbol locally at once;
    /// membership in the other direction is ack-driven instead.
    fn unsubscribe(&self, symbol: &str) {
        if !self.validated(symbol) {
            return;
        }
        self.publish(Message::unsubscribe(symbol));
        match self.session.lock() {
            Ok(mut session) => {
                session.forget(symbol);
            }
            Err(e) => error!("Session lock poisoned: {}", e),
        }
        info!("Unsubscribed from {}", symbol);
    }

    fn query(&self, symbol: &str) {
        if !self.validated(symbol) {
            return;
        }
        self.publish(Message::query(symbol));
    }

    fn request_price_history(&self, symbol: &str) {
        if !self.validated(symbol) {
            return;
        }
        self.publish(Message::request_price_history(symbol));
    }

    fn graph(&self, symbol: &str) {
        match self.session.lock() {
            Ok(session) => print!("{}", render::price_graph(symbol, &session, &self.fx)),
            Err(e) => error!("Session lock poisoned: {}", e),
        }
    }

    fn list_stocks(&self) {
        match self.session.lock() {
            Ok(session) => print!("{}", render::stock_list(&session, &self.fx)),
            Err(e) => error!("Session lock poisoned: {}", e),
        }
    }

    fn clear_screen(&self) {
        print!("\x1B[2J\x1B[H");
        let _ = io::stdout().flush();
        print!("{}", render::welcome_banner());
    }

    fn set_currency(&self, code: &str) {
        let code = code.to_ascii_uppercase();
        if !self.fx.supports(&code) {
            warn!(
                "Unsupported currency: {}. Supported: {}",
                code,
                self.fx.supported_codes().join(", ")
            );
            return;
        }
        match self.session.lock() {
            Ok(mut session) => {
                session.set_display_currency(&code);
                println!("Display currency set to {}", code);
            }
            Err(e) => error!("Session lock poisoned: {}", e),
        }
    }

    fn stop(&self) {
        info!("Exiting TickrShell...");
        self.running.store(false, Ordering::SeqCst);
    }

    fn validated(&self, symbol: &str) -> bool {
        if is_valid_symbol_format(symbol) {
            return true;
        }
        info!("Invalid symbol format. Symbols should be 1-5 uppercase letters.");
        false
    }

    fn publish(&self, msg: Message) {
        if let Err(e) = self.sender.send(&msg) {
            error!("Failed to publish message: {}", e);
        }
    }
}

/// Prompt for a y/n confirmation on the terminal.
fn confirm_action(action: &str, symbol: &str) -> bool {
    print!("Are you sure you want to {} {}? (y/n): ", action, symbol);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut response = String::new();
    if io::stdin().read_line(&mut response).is_err() {
        return false;
    }
    matches!(response.trim(), "y" | "Y")
}

/// Poll the subscriber until the running flag clears, reconciling every
/// inbound message into the session cache.
fn receive_loop(
    receiver: &mut BusReceiver,
    sender: &MessageSender,
    session: &Mutex<Session>,
    fx: &CurrencyService,
    running: &AtomicBool,
) {
    while running.load(Ordering::Relaxed) {
        if let Some(msg) = receiver.receive() {
            if let Err(e) = apply_message(msg, sender, session, fx) {
                error!("Failed to apply inbound message: {}", e);
            }
            let _ = io::stdout().flush();
        }
        thread::sleep(Duration::from_millis(POLL_PAUSE_MS));
    }
    info!("Receive loop stopping...");
}

/// Reconcile one inbound message into the cache and print its effect.
fn apply_message(
    msg: Message,
    sender: &MessageSender,
    session: &Mutex<Session>,
    fx: &CurrencyService,
) -> Result<()> {
    let mut session = session.lock()?;
    match msg {
        Message::QuoteUpdate { quote } => {
            let display = String::from(session.display_currency());
            let price = render::format_price(quote.price, &quote.currency, &display, fx);
            let change = quote.change_percent.unwrap_or(0.0);
            if session.is_tracked(&quote.symbol) {
                session.upsert_quote(&quote);
                println!(
                    "Received stock update: {} - {} ({:.2}% change)",
                    quote.symbol, price, change
                );
            } else {
                // One-shot query reply; shown but never cached.
                println!("Queried stock: {} - {} ({:.2}% change)", quote.symbol, price, change);
            }
        }
        Message::PriceHistoryResponse {
            symbol,
            price_history,
        } => {
            session.replace_history(&symbol, &price_history);
            println!("Price history for: {}", symbol);
            let display = String::from(session.display_currency());
            if let Some(data) = session.get(&symbol) {
                for price in &data.price_history {
                    println!("  {}", render::format_price(*price, &data.currency, &display, fx));
                }
            }
        }
        Message::SubscriptionsList { subscriptions } => {
            let added = session.restore(&subscriptions);
            for symbol in &added {
                println!("Restored subscription to stock: {}", symbol);
                // Prime the fresh entry with a current price.
                if let Err(e) = sender.send(&Message::query(symbol)) {
                    error!("Failed to publish message: {}", e);
                }
            }
            println!(
                "Number of subscribed stocks in local cache: {}",
                session.len()
            );
            print!("\n> ");
        }
        Message::Subscribe { symbol } => {
            // The authoritative membership event; the outbound request
            // never touches the cache.
            if session.track(&symbol) {
                println!("Subscribed to stock: {}", symbol);
            }
        }
        Message::Error { error } => println!("Error: {}", error),
        other => warn!("Ignoring unexpected inbound message: {:?}", other),
    }
    Ok(())
}
