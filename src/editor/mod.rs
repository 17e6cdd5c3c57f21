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

//! The tunnel configuration editor: the wizard's data state and its
//! persistence, with the widgets stripped away. A presentation layer owns
//! the entry texts and the draft peer; everything else lives here.

pub mod keygen;
mod peer_list;
pub mod validate;

pub use peer_list::{CursorView, PeerList};

use anyhow::{bail, Context};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::store::{self, ConfigStore};

/// Reserved value meaning "field intentionally left unset". The peer and
/// interface pages put it in optional entries; it is distinct from the
/// empty string, which means "not filled in yet".
pub const UNSET: &str = "(unset)";

/// The reserved configuration. It can be edited but never deleted.
pub const DEFAULT_CONFIG: &str = "Default";

/// Key utility invoked for genkey/pubkey unless overridden.
pub const DEFAULT_WG_BIN: &str = "wg";

fn unset_string() -> String {
    UNSET.into()
}

/// One tunnel endpoint. All fields hold entry text; optional ones hold
/// [`UNSET`] when left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Peer {
    pub public_key: String,

    #[serde(default = "unset_string", skip_serializing_if = "validate::is_unset")]
    pub preshared_key: String,

    #[serde(rename = "EndPoint", alias = "Endpoint")]
    pub endpoint: String,

    /// Stored and restored verbatim, no structural validation.
    #[serde(
        rename = "AllowedIPs",
        default = "unset_string",
        skip_serializing_if = "validate::is_unset"
    )]
    pub allowed_ips: String,
}

impl Peer {
    pub fn new() -> Peer {
        Peer {
            public_key: String::new(),
            preshared_key: UNSET.into(),
            endpoint: String::new(),
            allowed_ips: UNSET.into(),
        }
    }
}

impl Default for Peer {
    fn default() -> Peer {
        Peer::new()
    }
}

/// One named configuration, as loaded from and committed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TunnelConfig {
    /// Store path segment; alphanumeric only. Not part of the serialized
    /// form, it is the name of the form.
    #[serde(skip)]
    pub name: String,

    #[serde(default)]
    pub private_key: String,

    /// Always derived from `private_key`, never entered by hand, and never
    /// persisted.
    #[serde(skip)]
    pub public_key: String,

    #[serde(default)]
    pub address: String,

    #[serde(
        rename = "DNSAddress",
        alias = "DNS",
        default = "unset_string",
        skip_serializing_if = "validate::is_unset"
    )]
    pub dns_address: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub listen_port: String,

    #[serde(rename = "SystemTunnel", default)]
    pub system_wide_tunnel_enabled: bool,

    #[serde(rename = "Peer", default, skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<Peer>,
}

impl TunnelConfig {
    pub fn new(name: &str) -> TunnelConfig {
        TunnelConfig {
            name: name.into(),
            private_key: String::new(),
            public_key: String::new(),
            address: String::new(),
            dns_address: UNSET.into(),
            listen_port: String::new(),
            system_wide_tunnel_enabled: false,
            peers: vec![],
        }
    }
}

/// Wizard pages, in visiting order. `Peers` is only reachable while the
/// peers option is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Main,
    Interface,
    Peers,
    Committed,
    Cancelled,
}

impl Page {
    pub fn is_terminal(self) -> bool {
        matches!(self, Page::Committed | Page::Cancelled)
    }
}

/// Editor session. One per wizard run; holds all mutable state, so there
/// are no process-wide singletons to reset between runs.
#[derive(Debug, Clone)]
pub struct ConfigEditor {
    page: Page,
    editing_existing: bool,
    peers_enabled: bool,
    wg_bin: String,

    name: String,
    private_key: String,
    public_key: String,
    address: String,
    dns_address: String,
    listen_port: String,
    system_wide_tunnel_enabled: bool,

    peers: PeerList,
}

impl ConfigEditor {
    /// Fresh session for a new configuration.
    pub fn new(wg_bin: &str) -> ConfigEditor {
        ConfigEditor::seed(TunnelConfig::new(""), false, wg_bin)
    }

    /// Session seeded from an existing configuration.
    pub fn edit(config: TunnelConfig, wg_bin: &str) -> ConfigEditor {
        ConfigEditor::seed(config, true, wg_bin)
    }

    /// Session seeded from a configuration that is not in the store yet
    /// (the `import` command).
    pub fn from_config(config: TunnelConfig, wg_bin: &str) -> ConfigEditor {
        ConfigEditor::seed(config, false, wg_bin)
    }

    fn seed(config: TunnelConfig, editing_existing: bool, wg_bin: &str) -> ConfigEditor {
        ConfigEditor {
            page: Page::Main,
            editing_existing,
            peers_enabled: !config.peers.is_empty(),
            wg_bin: wg_bin.into(),
            name: config.name,
            private_key: config.private_key,
            public_key: config.public_key,
            address: config.address,
            dns_address: config.dns_address,
            listen_port: config.listen_port,
            system_wide_tunnel_enabled: config.system_wide_tunnel_enabled,
            peers: PeerList::from_peers(config.peers),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn is_editing_existing(&self) -> bool {
        self.editing_existing
    }

    pub fn peers_enabled(&self) -> bool {
        self.peers_enabled
    }

    /// Snapshot of the current data state.
    pub fn config(&self) -> TunnelConfig {
        TunnelConfig {
            name: self.name.clone(),
            private_key: self.private_key.clone(),
            public_key: self.public_key.clone(),
            address: self.address.clone(),
            dns_address: self.dns_address.clone(),
            listen_port: self.listen_port.clone(),
            system_wide_tunnel_enabled: self.system_wide_tunnel_enabled,
            peers: self.peers.iter().cloned().collect(),
        }
    }

    // Field setters take whatever the entry holds and report whether it is
    // valid; the page indicator follows the return value.

    pub fn set_name(&mut self, name: &str) -> bool {
        self.name = name.into();
        validate::is_alnum_name(name)
    }

    pub fn set_address(&mut self, address: &str) -> bool {
        self.address = address.into();
        validate::is_cidr(address)
    }

    pub fn set_dns_address(&mut self, dns: &str) -> bool {
        self.dns_address = dns.into();
        validate::is_unset(dns) || validate::is_ip_literal(dns)
    }

    pub fn set_listen_port(&mut self, port: &str) -> bool {
        self.listen_port = port.into();
        port.is_empty() || matches!(port.parse::<u32>(), Ok(p) if (1..=65535).contains(&p))
    }

    /// A new private key invalidates the derived public key.
    pub fn set_private_key(&mut self, key: &str) -> bool {
        if self.private_key != key {
            self.public_key.clear();
        }
        self.private_key = key.into();
        validate::is_key(key)
    }

    pub fn set_system_wide_tunnel(&mut self, enabled: bool) {
        self.system_wide_tunnel_enabled = enabled;
    }

    /// Toggling this inserts or removes the peer page ahead of us.
    pub fn set_peers_enabled(&mut self, enabled: bool) {
        self.peers_enabled = enabled;
    }

    /// Generate a keypair through the key utility. On failure both fields
    /// keep their previous values and the error is only a page diagnostic.
    pub async fn generate_keypair(&mut self) -> anyhow::Result<()> {
        let private = keygen::generate_private_key(&self.wg_bin).await?;
        let public = keygen::derive_public_key(&self.wg_bin, &private).await?;
        self.private_key = private;
        self.public_key = public;
        Ok(())
    }

    /// Derive the public key for the private key currently in the field.
    pub async fn derive_public_key(&mut self) -> anyhow::Result<()> {
        if !validate::is_key(&self.private_key) {
            bail!("private key is missing or malformed");
        }
        self.public_key = keygen::derive_public_key(&self.wg_bin, &self.private_key).await?;
        Ok(())
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Whether the "next"/"finish" affordance of the current page is
    /// enabled.
    pub fn page_complete(&self) -> bool {
        let config = self.config();
        match self.page {
            Page::Main => validate::main_page_valid(&config),
            Page::Interface => validate::interface_page_valid(&config),
            // Peer edits are validated per peer as they are entered.
            Page::Peers => true,
            Page::Committed | Page::Cancelled => false,
        }
    }

    /// Move to the next page if the current one is complete. Forward only;
    /// the returned page is unchanged when validation blocks.
    pub fn next_page(&mut self) -> Page {
        if self.page_complete() {
            self.page = match self.page {
                Page::Main => Page::Interface,
                Page::Interface if self.peers_enabled => Page::Peers,
                other => other,
            };
        }
        self.page
    }

    // Peer page operations. The draft peer belongs to the page; it comes
    // in here only to be checked or stored.

    pub fn peer_view(&self) -> CursorView<'_> {
        self.peers.view()
    }

    pub fn peer_advance(&mut self) -> CursorView<'_> {
        self.peers.advance()
    }

    pub fn peer_retreat(&mut self) -> CursorView<'_> {
        self.peers.retreat()
    }

    pub fn peer_draft_valid(&self, draft: &Peer) -> bool {
        validate::peer_page_valid(draft, self.peers.view().peer)
    }

    /// Store the draft at the cursor. Rejected drafts leave the list
    /// untouched.
    pub fn upsert_peer(&mut self, draft: Peer) -> bool {
        if !self.peer_draft_valid(&draft) {
            return false;
        }
        self.peers.upsert_at_cursor(draft);
        true
    }

    pub fn remove_peer(&mut self) -> CursorView<'_> {
        self.peers.remove_at_cursor()
    }

    /// Wizard "apply". The whole configuration has to pass the page checks
    /// before anything is written. Writes every scalar field, then replaces
    /// the stored peer set wholesale: the old `peers` subtree is destroyed
    /// and the in-memory list is written back as `peer0..peerN-1`. Stored
    /// peer identifiers are therefore renumbered on every commit.
    pub fn commit(&mut self, store: &mut dyn ConfigStore) -> anyhow::Result<()> {
        if self.page.is_terminal() {
            bail!("wizard already finished");
        }
        let problems = validate::config_problems(&self.config());
        if !problems.is_empty() {
            bail!("configuration is not valid: {}", problems.join("; "));
        }

        let root = store::config_root(&self.name);
        store
            .set_string(&format!("{}/PrivateKey", root), &self.private_key)
            .context("failed to write private key")?;
        store
            .set_string(&format!("{}/Address", root), &self.address)
            .context("failed to write address")?;
        let dns_path = format!("{}/DNSAddress", root);
        if validate::is_unset(&self.dns_address) {
            store.unset(&dns_path)?;
        } else {
            store
                .set_string(&dns_path, &self.dns_address)
                .context("failed to write DNS address")?;
        }
        let port_path = format!("{}/ListenPort", root);
        if self.listen_port.is_empty() {
            store.unset(&port_path)?;
        } else {
            store
                .set_string(&port_path, &self.listen_port)
                .context("failed to write listen port")?;
        }
        store
            .set_bool(
                &format!("{}/systemtunnel-enabled", root),
                self.system_wide_tunnel_enabled,
            )
            .context("failed to write tunnel flag")?;

        store
            .recursive_unset(&store::peers_root(&self.name))
            .context("failed to clear stored peers")?;
        for (idx, peer) in self.peers.iter().enumerate() {
            let peer_root = store::peer_root(&self.name, idx);
            store.set_string(&format!("{}/PublicKey", peer_root), &peer.public_key)?;
            store.set_string(&format!("{}/EndPoint", peer_root), &peer.endpoint)?;
            if !validate::is_unset(&peer.preshared_key) {
                store.set_string(&format!("{}/PresharedKey", peer_root), &peer.preshared_key)?;
            }
            if !validate::is_unset(&peer.allowed_ips) {
                store.set_string(&format!("{}/AllowedIPs", peer_root), &peer.allowed_ips)?;
            }
        }

        info!(
            "committed configuration {} with {} peers",
            self.name,
            self.peers.len()
        );
        self.page = Page::Committed;
        Ok(())
    }

    /// Wizard close/cancel: in-memory peer edits are discarded.
    pub fn cancel(&mut self) {
        self.peers.clear();
        self.page = Page::Cancelled;
    }
}

/// Store read that reports errors but surfaces them as absence, which is
/// what every field falls back to.
fn string_or_absent(store: &dyn ConfigStore, path: &str) -> Option<String> {
    match store.get_string(path) {
        Ok(v) => v,
        Err(e) => {
            warn!("store read {} failed, treating as absent: {:#}", path, e);
            None
        }
    }
}

fn bool_or_absent(store: &dyn ConfigStore, path: &str) -> Option<bool> {
    match store.get_bool(path) {
        Ok(v) => v,
        Err(e) => {
            warn!("store read {} failed, treating as absent: {:#}", path, e);
            None
        }
    }
}

/// Stored peer directories are `peer<N>`; order them by N, not
/// lexicographically, or `peer10` would come back before `peer2`. Foreign
/// directory names sort last.
fn peer_dir_index(path: &str) -> usize {
    store::basename(path)
        .strip_prefix("peer")
        .and_then(|n| n.parse().ok())
        .unwrap_or(usize::MAX)
}

/// Load a configuration and all of its peers. Peers are fetched one by one
/// after a directory listing; there is no transactional guarantee across
/// them. Absent fields come back as their blank/unset defaults.
pub fn load_config(store: &dyn ConfigStore, name: &str) -> TunnelConfig {
    let root = store::config_root(name);
    let mut config = TunnelConfig::new(name);

    if let Some(v) = string_or_absent(store, &format!("{}/PrivateKey", root)) {
        config.private_key = v;
    }
    if let Some(v) = string_or_absent(store, &format!("{}/Address", root)) {
        config.address = v;
    }
    if let Some(v) = string_or_absent(store, &format!("{}/DNSAddress", root)) {
        config.dns_address = v;
    }
    if let Some(v) = string_or_absent(store, &format!("{}/ListenPort", root)) {
        config.listen_port = v;
    }
    config.system_wide_tunnel_enabled =
        bool_or_absent(store, &format!("{}/systemtunnel-enabled", root)).unwrap_or(false);

    let peers_root = store::peers_root(name);
    let mut peer_dirs = match store.dir_exists(&peers_root) {
        Ok(true) => match store.list_dirs(&peers_root) {
            Ok(dirs) => dirs,
            Err(e) => {
                warn!("failed to list peers of {}: {:#}", name, e);
                vec![]
            }
        },
        Ok(false) => vec![],
        Err(e) => {
            warn!("failed to check peers of {}: {:#}", name, e);
            vec![]
        }
    };
    peer_dirs.sort_by_key(|d| peer_dir_index(d));
    for dir in peer_dirs {
        let mut peer = Peer::new();
        if let Some(v) = string_or_absent(store, &format!("{}/PublicKey", dir)) {
            peer.public_key = v;
        }
        if let Some(v) = string_or_absent(store, &format!("{}/PresharedKey", dir)) {
            peer.preshared_key = v;
        }
        if let Some(v) = string_or_absent(store, &format!("{}/EndPoint", dir)) {
            peer.endpoint = v;
        }
        if let Some(v) = string_or_absent(store, &format!("{}/AllowedIPs", dir)) {
            peer.allowed_ips = v;
        }
        config.peers.push(peer);
    }

    config
}

/// Names of all stored configurations.
pub fn list_configs(store: &dyn ConfigStore) -> Vec<String> {
    match store.list_dirs(store::ROOT) {
        Ok(dirs) => dirs
            .iter()
            .map(|d| store::basename(d).to_string())
            .collect(),
        Err(e) => {
            warn!("failed to list configurations: {:#}", e);
            vec![]
        }
    }
}

/// Remove a stored configuration. The reserved [`DEFAULT_CONFIG`] is never
/// deleted; that and a missing configuration both return `false` with the
/// store untouched.
pub fn delete_config(store: &mut dyn ConfigStore, name: &str) -> anyhow::Result<bool> {
    if name == DEFAULT_CONFIG {
        info!("refusing to delete the {} configuration", DEFAULT_CONFIG);
        return Ok(false);
    }
    let root = store::config_root(name);
    if !store.dir_exists(&root)? {
        return Ok(false);
    }
    store.recursive_unset(&root)?;
    Ok(true)
}

/// Mark a stored configuration as the one the connectivity layer should
/// use.
pub fn set_active(store: &mut dyn ConfigStore, name: &str) -> anyhow::Result<()> {
    if !store.dir_exists(&store::config_root(name))? {
        bail!("no configuration named {:?}", name);
    }
    store.set_string(store::ACTIVE_CONFIG_KEY, name)
}

pub fn active_config(store: &dyn ConfigStore) -> Option<String> {
    string_or_absent(store, store::ACTIVE_CONFIG_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const KEY: &str = "2BJtcgPUjHfKKN3yMvTiVQbJ/UgHj2tcZE6xU/4BdGM=";
    const KEY2: &str = "Ck8P+fUguLIf17zmb3eWxxS7PqgN3+ciMFBlSwqRaw4=";

    fn peer(n: u32) -> Peer {
        Peer {
            public_key: KEY2.into(),
            preshared_key: UNSET.into(),
            endpoint: format!("192.0.2.{}:51820", n),
            allowed_ips: "0.0.0.0/0".into(),
        }
    }

    fn editor_with_peers(name: &str, n: u32) -> ConfigEditor {
        let mut config = TunnelConfig::new(name);
        config.private_key = KEY.into();
        config.public_key = KEY2.into();
        config.address = "10.0.0.2/24".into();
        config.peers = (0..n).map(peer).collect();
        ConfigEditor::from_config(config, DEFAULT_WG_BIN)
    }

    #[test]
    fn commit_then_reload_round_trips() {
        let mut store = MemoryStore::new();
        let mut editor = editor_with_peers("vpn", 3);
        let before = editor.config();
        editor.commit(&mut store).unwrap();
        assert_eq!(editor.page(), Page::Committed);

        let loaded = load_config(&store, "vpn");
        assert_eq!(loaded.private_key, before.private_key);
        assert_eq!(loaded.address, before.address);
        assert_eq!(loaded.dns_address, UNSET);
        assert_eq!(
            loaded.system_wide_tunnel_enabled,
            before.system_wide_tunnel_enabled
        );
        assert_eq!(loaded.peers, before.peers);
        // The public key is derived, not stored.
        assert_eq!(loaded.public_key, "");
    }

    #[test]
    fn recommit_renumbers_peers_from_zero() {
        let mut store = MemoryStore::new();
        let mut editor = editor_with_peers("vpn", 3);
        editor.commit(&mut store).unwrap();

        // Drop the middle peer and commit again. The public key is not
        // stored, so an edit session re-derives it before the interface
        // page can complete.
        let mut editor = ConfigEditor::edit(load_config(&store, "vpn"), DEFAULT_WG_BIN);
        editor.public_key = KEY2.into();
        editor.peer_advance();
        editor.remove_peer();
        editor.commit(&mut store).unwrap();

        let dirs = store
            .list_dirs(&crate::store::peers_root("vpn"))
            .unwrap();
        assert_eq!(
            dirs,
            vec![
                "/system/maemo/wireguard/vpn/peers/peer0",
                "/system/maemo/wireguard/vpn/peers/peer1",
            ]
        );
        assert_eq!(load_config(&store, "vpn").peers.len(), 2);
    }

    #[test]
    fn reload_keeps_peer_order_past_ten_peers() {
        let mut store = MemoryStore::new();
        // Eleven peers: lexicographic listing would put peer10 before
        // peer2.
        let mut editor = editor_with_peers("vpn", 11);
        let before = editor.config().peers;
        editor.commit(&mut store).unwrap();

        let loaded = load_config(&store, "vpn");
        assert_eq!(loaded.peers, before);
    }

    #[test]
    fn incomplete_config_blocks_commit() {
        let mut store = MemoryStore::new();
        let mut config = TunnelConfig::new("vpn");
        config.private_key = KEY.into();
        config.public_key = KEY2.into();
        // Address without a prefix never passes the interface page, so it
        // must not reach the store either.
        config.address = "10.0.0.2".into();
        let mut editor = ConfigEditor::from_config(config, DEFAULT_WG_BIN);
        assert!(editor.commit(&mut store).is_err());
        assert!(store.is_empty());
        assert_ne!(editor.page(), Page::Committed);
    }

    #[test]
    fn invalid_name_blocks_commit_before_any_write() {
        let mut store = MemoryStore::new();
        let mut editor = editor_with_peers("My Vpn", 1);
        assert!(editor.commit(&mut store).is_err());
        assert!(store.is_empty());
        assert_ne!(editor.page(), Page::Committed);
    }

    #[test]
    fn default_config_cannot_be_deleted() {
        let mut store = MemoryStore::new();
        let mut editor = editor_with_peers(DEFAULT_CONFIG, 1);
        editor.commit(&mut store).unwrap();

        let before = store.clone();
        assert!(!delete_config(&mut store, DEFAULT_CONFIG).unwrap());
        assert_eq!(store, before);

        // Other configurations do get deleted.
        let mut editor = editor_with_peers("other", 0);
        editor.commit(&mut store).unwrap();
        assert!(delete_config(&mut store, "other").unwrap());
        assert!(!delete_config(&mut store, "other").unwrap());
        assert_eq!(list_configs(&store), vec![DEFAULT_CONFIG.to_string()]);
    }

    #[test]
    fn page_flow_with_and_without_peers() {
        let mut editor = ConfigEditor::new(DEFAULT_WG_BIN);
        assert_eq!(editor.page(), Page::Main);

        // Invalid name blocks advancement.
        editor.set_name("My Vpn");
        assert_eq!(editor.next_page(), Page::Main);

        editor.set_name("vpn");
        assert_eq!(editor.next_page(), Page::Interface);

        // Incomplete interface page blocks.
        assert_eq!(editor.next_page(), Page::Interface);
        editor.set_address("10.0.0.2/24");
        editor.set_private_key(KEY);
        editor.public_key = KEY2.into();
        // Peers disabled: interface is the last content page.
        assert_eq!(editor.next_page(), Page::Interface);

        editor.set_peers_enabled(true);
        assert_eq!(editor.next_page(), Page::Peers);
    }

    #[test]
    fn cancel_discards_peer_edits() {
        let mut editor = editor_with_peers("vpn", 2);
        editor.cancel();
        assert_eq!(editor.page(), Page::Cancelled);
        assert!(editor.config().peers.is_empty());

        let mut store = MemoryStore::new();
        assert!(editor.commit(&mut store).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn setting_private_key_clears_derived_public_key() {
        let mut editor = editor_with_peers("vpn", 0);
        assert_eq!(editor.public_key(), KEY2);
        assert!(editor.set_private_key(KEY2));
        assert_eq!(editor.public_key(), "");
        // Same key again: nothing to invalidate.
        editor.public_key = KEY.into();
        assert!(editor.set_private_key(KEY2));
        assert_eq!(editor.public_key(), KEY);
    }

    #[test]
    fn upsert_rejects_invalid_draft() {
        let mut editor = editor_with_peers("vpn", 1);
        let mut draft = Peer::new();
        draft.public_key = "short".into();
        draft.endpoint = "192.0.2.9:51820".into();
        assert!(!editor.upsert_peer(draft));
        assert_eq!(editor.config().peers.len(), 1);

        // The untouched current peer passes through as a no-op.
        let current = editor.peer_view().peer.unwrap().clone();
        assert!(editor.upsert_peer(current));
        assert_eq!(editor.config().peers.len(), 1);
    }

    #[test]
    fn store_errors_read_as_absent() {
        let mut store = MemoryStore::new();
        let mut editor = editor_with_peers("vpn", 0);
        editor.commit(&mut store).unwrap();

        // Corrupt the flag with the wrong type; the load falls back to the
        // default instead of failing.
        store
            .set_string("/system/maemo/wireguard/vpn/systemtunnel-enabled", "yes")
            .unwrap();
        let loaded = load_config(&store, "vpn");
        assert!(!loaded.system_wide_tunnel_enabled);
        assert_eq!(loaded.private_key, KEY);
    }

    #[test]
    fn active_config_marker() {
        let mut store = MemoryStore::new();
        assert_eq!(active_config(&store), None);
        assert!(set_active(&mut store, "vpn").is_err());

        let mut editor = editor_with_peers("vpn", 0);
        editor.commit(&mut store).unwrap();
        set_active(&mut store, "vpn").unwrap();
        assert_eq!(active_config(&store), Some("vpn".into()));

        // The marker key is not a configuration directory.
        assert_eq!(list_configs(&store), vec!["vpn".to_string()]);
    }

    #[test]
    fn serde_round_trip() {
        let mut config = TunnelConfig::new("vpn");
        config.private_key = KEY.into();
        config.address = "10.0.0.2/24".into();
        config.peers = vec![peer(1)];

        let text = toml::to_string(&config).unwrap();
        // Unset optionals stay out of the serialized form.
        assert!(!text.contains("DNSAddress"));
        assert!(!text.contains("PresharedKey"));

        let mut parsed: TunnelConfig = toml::from_str(&text).unwrap();
        parsed.name = "vpn".into();
        assert_eq!(parsed, config);
    }
}
