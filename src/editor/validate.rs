// Copyright 2022 wgconf developers

// This file is part of wgconf.

// wgconf is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// wgconf is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with wgconf.  If not, see <https://www.gnu.org/licenses/>.

//! Field validation. Everything here is a pure predicate; the editor and
//! the presentation layer decide what to do with a `false`.

use std::net::IpAddr;

use crate::editor::{Peer, TunnelConfig, UNSET};

/// Base64 of a 32-byte curve key, including padding.
pub const KEY_LEN: usize = 44;

/// Configuration names become store path segments, so only allow
/// alphanumeric ASCII.
pub fn is_alnum_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Textual IPv4 or IPv6 address. No resolution.
pub fn is_ip_literal(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

/// `ip/prefix` with the prefix restricted to the range usable for a tunnel
/// interface address.
pub fn is_cidr(s: &str) -> bool {
    let mut parts = s.splitn(2, '/');
    let ip = parts.next().unwrap_or("");
    let prefix = match parts.next() {
        None => return false,
        Some(p) => p,
    };
    if !is_ip_literal(ip) {
        return false;
    }
    matches!(prefix.parse::<u32>(), Ok(p) if (16..=30).contains(&p))
}

/// `host:port`, host an IP literal. A bare IPv6 host has more than one
/// colon and is rejected here, like in the original applet.
pub fn is_endpoint(s: &str) -> bool {
    let mut parts = s.splitn(2, ':');
    let host = parts.next().unwrap_or("");
    let port = match parts.next() {
        None => return false,
        Some(p) => p,
    };
    if !is_ip_literal(host) {
        return false;
    }
    matches!(port.parse::<u32>(), Ok(p) if (1..=65535).contains(&p))
}

/// Recognized "intentionally left unset" values for optional fields.
pub fn is_unset(s: &str) -> bool {
    s.is_empty() || s == UNSET
}

/// Exactly one base64 key. Sentinels do not pass.
pub fn is_key(s: &str) -> bool {
    s.len() == KEY_LEN
}

/// A key, or an optional field left unset.
pub fn is_key_like(s: &str) -> bool {
    is_key(s) || is_unset(s)
}

/// Main wizard page: the configuration name.
pub fn main_page_valid(config: &TunnelConfig) -> bool {
    is_alnum_name(&config.name)
}

/// Interface page: address, optional DNS, and both keys. The public key is
/// derived, never typed, but it still has to be present and well-formed
/// before the page can complete.
pub fn interface_page_valid(config: &TunnelConfig) -> bool {
    is_cidr(&config.address)
        && (is_unset(&config.dns_address) || is_ip_literal(&config.dns_address))
        && is_key(&config.private_key)
        && is_key(&config.public_key)
}

/// Peer page. A draft identical to the peer currently under the cursor is
/// trivially valid; stepping past an untouched peer is not an edit.
pub fn peer_page_valid(draft: &Peer, at_cursor: Option<&Peer>) -> bool {
    if at_cursor == Some(draft) {
        return true;
    }
    is_key(&draft.public_key) && is_key_like(&draft.preshared_key) && is_endpoint(&draft.endpoint)
}

/// All problems a complete configuration would be stopped on in the wizard,
/// one message per field. Used by the `check` command.
pub fn config_problems(config: &TunnelConfig) -> Vec<String> {
    let mut problems = Vec::new();
    if !is_alnum_name(&config.name) {
        problems.push(format!("name {:?} is not alphanumeric", config.name));
    }
    if !is_cidr(&config.address) {
        problems.push(format!("address {:?} is not ip/prefix", config.address));
    }
    if !is_unset(&config.dns_address) && !is_ip_literal(&config.dns_address) {
        problems.push(format!("DNS address {:?} is not an IP", config.dns_address));
    }
    if !is_key(&config.private_key) {
        problems.push("private key is missing or malformed".into());
    }
    if !is_key(&config.public_key) {
        problems.push("public key is missing, derive it from the private key".into());
    }
    if !config.listen_port.is_empty()
        && !matches!(config.listen_port.parse::<u32>(), Ok(p) if (1..=65535).contains(&p))
    {
        problems.push(format!("listen port {:?} is invalid", config.listen_port));
    }
    for (i, peer) in config.peers.iter().enumerate() {
        if !is_key(&peer.public_key) {
            problems.push(format!("peer {}: public key is missing or malformed", i));
        }
        if !is_key_like(&peer.preshared_key) {
            problems.push(format!("peer {}: preshared key is malformed", i));
        }
        if !is_endpoint(&peer.endpoint) {
            problems.push(format!("peer {}: endpoint {:?} is invalid", i, peer.endpoint));
        }
        // AllowedIPs is stored verbatim, no structural check.
    }
    problems
}
