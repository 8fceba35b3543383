//! Typed bus endpoint: the pub/sub socket pair with the message codec on top.
//!
//! The outbound side is shared by both loops (the input loop publishes user
//! intents, the receive loop publishes priming queries during restoration),
//! so [`MessageSender`] is a cloneable handle over the single publisher.
//! The inbound side stays exclusive to the receive loop.
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::warn;
use tickr_common::Result;
use tickr_common::bus::{PubSocket, SubSocket};
use tickr_common::message::Message;

/// Cloneable handle for publishing messages on the outbound channel.
#[derive(Clone)]
pub struct MessageSender {
    socket: Arc<Mutex<PubSocket>>,
}

impl MessageSender {
    pub(crate) fn new(socket: PubSocket) -> Self {
        Self {
            socket: Arc::new(Mutex::new(socket)),
        }
    }

    /// Encode `msg` and publish it. Non-blocking beyond codec work; a
    /// transport rejection surfaces as `TransportFailed`.
    pub fn send(&self, msg: &Message) -> Result<()> {
        let frame = msg.to_json_bytes()?;
        let mut socket = self.socket.lock()?;
        socket.send(&frame)
    }

    /// Wait until the service has attached as a subscriber, bounded by
    /// `timeout`. Returns whether a peer is attached.
    pub fn wait_for_service(&self, timeout: Duration) -> Result<bool> {
        let mut socket = self.socket.lock()?;
        Ok(socket.wait_for_subscriber(timeout))
    }

    /// Address the outbound publisher is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.lock()?.local_addr())
    }
}

/// Receiving half of the endpoint, owned by the receive loop.
pub struct BusReceiver {
    subscriber: SubSocket,
}

impl BusReceiver {
    pub(crate) fn new(subscriber: SubSocket) -> Self {
        Self { subscriber }
    }

    /// One bounded-timeout read, decoded. `None` means no message this
    /// tick; an undecodable frame is logged and dropped, never fatal.
    pub fn receive(&mut self) -> Option<Message> {
        let frame = self.subscriber.recv()?;
        match Message::from_json_bytes(&frame) {
            Ok(msg) => Some(msg),
            Err(e) => {
                warn!("Dropping undecodable frame: {}", e);
                None
            }
        }
    }
}

/// The client's two one-directional bus channels.
pub struct BusEndpoint;

impl BusEndpoint {
    /// Bind the outbound publisher on `pub_bind`, connect the inbound
    /// subscriber to `sub_addr`, and install the accept-all topic filter.
    pub fn open(pub_bind: &str, sub_addr: &str) -> Result<(MessageSender, BusReceiver)> {
        let publisher = PubSocket::bind(pub_bind)?;
        let mut subscriber = SubSocket::connect(sub_addr)?;
        subscriber.set_filter("");
        Ok((MessageSender::new(publisher), BusReceiver::new(subscriber)))
    }
}
