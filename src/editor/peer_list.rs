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

use crate::editor::Peer;

/// Ordered peer collection plus the cursor the peer page steps through it
/// with. The cursor may sit one past the last entry; that position is the
/// blank slot a new peer is appended from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerList {
    peers: Vec<Peer>,
    cursor: usize,
}

/// What the peer page shows for the current cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorView<'a> {
    /// Entry under the cursor. `None` on the blank slot past the end;
    /// the page clears its fields then.
    pub peer: Option<&'a Peer>,
    pub can_advance: bool,
    pub can_retreat: bool,
}

impl PeerList {
    pub fn new() -> PeerList {
        PeerList::default()
    }

    pub fn from_peers(peers: Vec<Peer>) -> PeerList {
        PeerList { peers, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter()
    }

    pub fn into_peers(self) -> Vec<Peer> {
        self.peers
    }

    pub fn clear(&mut self) {
        self.peers.clear();
        self.cursor = 0;
    }

    pub fn view(&self) -> CursorView<'_> {
        CursorView {
            peer: self.peers.get(self.cursor),
            can_advance: self.cursor < self.peers.len(),
            can_retreat: self.cursor > 0,
        }
    }

    /// Replace the entry under the cursor, or append when the cursor is on
    /// the blank slot. A peer field-wise equal to the entry under the cursor
    /// is a no-op, so stepping over an untouched peer never duplicates it.
    /// The cursor does not move.
    pub fn upsert_at_cursor(&mut self, peer: Peer) {
        match self.peers.get_mut(self.cursor) {
            Some(current) => {
                if *current != peer {
                    *current = peer;
                }
            }
            None => self.peers.push(peer),
        }
    }

    /// Remove the entry under the cursor, if any, and step back so the page
    /// has something to show again.
    pub fn remove_at_cursor(&mut self) -> CursorView<'_> {
        if self.cursor < self.peers.len() {
            self.peers.remove(self.cursor);
            self.cursor = self.cursor.saturating_sub(1);
        }
        self.view()
    }

    /// Step forward, stopping at the blank slot past the last entry.
    pub fn advance(&mut self) -> CursorView<'_> {
        if self.cursor < self.peers.len() {
            self.cursor += 1;
        }
        self.view()
    }

    /// Step backward, clamped at the first entry.
    pub fn retreat(&mut self) -> CursorView<'_> {
        self.cursor = self.cursor.saturating_sub(1);
        self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(n: u32) -> Peer {
        let mut p = Peer::new();
        p.public_key = format!("peer-{}", n);
        p.endpoint = format!("192.0.2.{}:51820", n);
        p
    }

    #[test]
    fn upsert_appends_on_blank_slot() {
        let mut list = PeerList::new();
        list.upsert_at_cursor(peer(0));
        assert_eq!(list.len(), 1);
        assert_eq!(list.cursor(), 0);

        // Cursor still on peer 0; same content is a no-op.
        list.upsert_at_cursor(peer(0));
        assert_eq!(list.len(), 1);

        // Different content replaces in place.
        list.upsert_at_cursor(peer(7));
        assert_eq!(list.len(), 1);
        assert_eq!(list.view().peer, Some(&peer(7)));
    }

    #[test]
    fn upsert_on_end_grows_by_one() {
        let mut list = PeerList::from_peers(vec![peer(0), peer(1)]);
        list.advance();
        list.advance();
        assert_eq!(list.cursor(), 2);
        list.upsert_at_cursor(peer(2));
        assert_eq!(list.len(), 3);
        assert_eq!(list.cursor(), 2);
    }

    #[test]
    fn advance_and_retreat() {
        let mut list = PeerList::from_peers(vec![peer(0), peer(1)]);

        let v = list.view();
        assert_eq!(v.peer, Some(&peer(0)));
        assert!(v.can_advance);
        assert!(!v.can_retreat);

        let v = list.advance();
        assert_eq!(v.peer, Some(&peer(1)));
        assert!(v.can_advance);
        assert!(v.can_retreat);

        // Past the last entry: fields cleared, next disabled.
        let v = list.advance();
        assert_eq!(v.peer, None);
        assert!(!v.can_advance);
        assert!(v.can_retreat);

        // Advancing on the blank slot stays put.
        let v = list.advance();
        assert_eq!(v.peer, None);
        assert!(!v.can_advance);
        assert_eq!(list.cursor(), 2);

        let v = list.retreat();
        assert_eq!(v.peer, Some(&peer(1)));

        // Clamped at zero.
        list.retreat();
        let v = list.retreat();
        assert_eq!(v.peer, Some(&peer(0)));
        assert!(!v.can_retreat);
    }

    #[test]
    fn advance_retreat_round_trip() {
        let mut list = PeerList::from_peers(vec![peer(0), peer(1), peer(2)]);
        list.advance();
        let before = list.cursor();
        let shown = list.view().peer.cloned();

        list.advance();
        list.retreat();

        assert_eq!(list.cursor(), before);
        assert_eq!(list.view().peer.cloned(), shown);
    }

    #[test]
    fn remove_steps_back() {
        let mut list = PeerList::from_peers(vec![peer(0), peer(1), peer(2)]);
        list.advance();
        assert_eq!(list.view().peer, Some(&peer(1)));

        let v = list.remove_at_cursor();
        assert_eq!(v.peer, Some(&peer(0)));
        assert!(v.can_advance);
        assert_eq!(list.len(), 2);

        // Removing the only remaining entries drains the list.
        list.remove_at_cursor();
        let v = list.remove_at_cursor();
        assert_eq!(v.peer, None);
        assert!(!v.can_advance);
        assert!(!v.can_retreat);
        assert!(list.is_empty());

        // Nothing left; removal is a no-op.
        list.remove_at_cursor();
        assert!(list.is_empty());
    }
}
