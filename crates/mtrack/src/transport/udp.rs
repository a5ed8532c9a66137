// SPDX-License-Identifier: Apache-2.0 OR MIT

//! UDP data channel: receives measurement payloads, sends feedback datagrams.
//!
//! One socket per tracker connection. The socket is bound with
//! SO_REUSEADDR so several clients on one machine can share a multicast
//! port, and carries a read timeout so `recv` never blocks forever.

use super::TransportError;
use crate::config::FEEDBACK_PORT;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::time::Duration;

/// UDP receiver for the measurement data stream.
#[derive(Debug)]
pub struct DataTransport {
    socket: UdpSocket,
    /// Multicast group joined at bind time, left again on drop.
    multicast_group: Option<Ipv4Addr>,
}

impl DataTransport {
    /// Bind a data socket on `0.0.0.0:<port>` (port 0 lets the OS pick).
    ///
    /// When `multicast_group` is set, the socket joins that group on the
    /// default interface and accepts multicast payloads as well.
    pub fn bind(
        port: u16,
        multicast_group: Option<Ipv4Addr>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let socket2 = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket2.set_reuse_address(true)?;

        let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        socket2.bind(&bind_addr.into())?;
        log::debug!("[UDP] data channel bind addr={}", bind_addr);

        let socket: UdpSocket = socket2.into();
        socket.set_read_timeout(Some(timeout))?;

        if let Some(group) = multicast_group {
            if !group.is_multicast() {
                return Err(TransportError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "address is not a multicast group",
                )));
            }
            socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)?;
            log::debug!("[UDP] joined multicast group={}", group);
        }

        Ok(Self {
            socket,
            multicast_group,
        })
    }

    /// The local port the socket ended up bound to.
    pub fn local_port(&self) -> Result<u16, TransportError> {
        Ok(self.socket.local_addr()?.port())
    }

    /// Replace the receive timeout.
    pub fn set_timeout(&self, timeout: Duration) -> Result<(), TransportError> {
        self.socket.set_read_timeout(Some(timeout))?;
        Ok(())
    }

    /// Receive one datagram into `buf`, returning its length.
    ///
    /// A datagram that fills the buffer completely is reported as
    /// [`TransportError::BufferTooSmall`] since the tail may have been
    /// discarded by the kernel.
    pub fn recv(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let (len, from) = self.socket.recv_from(buf)?;
        if len >= buf.len() {
            return Err(TransportError::BufferTooSmall {
                buffer_size: buf.len(),
            });
        }
        log::trace!("[UDP] recv len={} from={}", len, from);
        Ok(len)
    }

    /// Send a feedback datagram to the device's feedback port.
    pub fn send_feedback(&self, host: IpAddr, payload: &[u8]) -> Result<(), TransportError> {
        let dest = match host {
            IpAddr::V4(ip) => SocketAddr::V4(SocketAddrV4::new(ip, FEEDBACK_PORT)),
            IpAddr::V6(_) => {
                return Err(TransportError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "feedback channel is IPv4 only",
                )))
            }
        };
        let sent = self.socket.send_to(payload, dest)?;
        if sent != payload.len() {
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::WriteZero,
                "short feedback send",
            )));
        }
        log::trace!("[UDP] feedback sent len={} to={}", sent, dest);
        Ok(())
    }
}

impl Drop for DataTransport {
    fn drop(&mut self) {
        if let Some(group) = self.multicast_group {
            let _ = self.socket.leave_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED);
        }
    }
}
