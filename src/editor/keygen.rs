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

//! Key generation and derivation through the external `wg` utility.
//!
//! The editor never computes curve keys itself. It pipes through the key
//! binary, writing the optional input, closing stdin to signal EOF, and
//! collecting stdout until the child closes it.

use anyhow::{bail, Context};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::time::timeout;

use crate::editor::validate::KEY_LEN;

/// Per-iteration readiness slice for the pipe loop. A slice that elapses
/// just polls again; it is not a deadline.
const IO_SLICE: Duration = Duration::from_millis(50);

/// Run `argv` with a pipe to its stdin and from its stdout. Returns the
/// first line of everything the child wrote; a second line, if any, is
/// discarded. There is no overall timeout: the call returns when the child
/// closes its output or fails.
pub async fn run_key_command(argv: &[&str], input: Option<&str>) -> anyhow::Result<String> {
    let (bin, args) = match argv.split_first() {
        None => bail!("empty key command"),
        Some(x) => x,
    };
    let mut child = Command::new(bin)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to spawn {}", bin))?;

    let mut stdin = child.stdin.take().context("child stdin missing")?;
    let mut stdout = child.stdout.take().context("child stdout missing")?;

    if let Some(text) = input {
        let bytes = text.as_bytes();
        let mut written = 0;
        while written < bytes.len() {
            match timeout(IO_SLICE, stdin.write(&bytes[written..])).await {
                // Not writable within the slice, poll again.
                Err(_elapsed) => continue,
                Ok(Ok(0)) => bail!("key command closed its input early"),
                Ok(Ok(n)) => written += n,
                Ok(Err(e)) => return Err(e).context("failed to write to key command"),
            }
        }
    }
    // EOF for the child.
    drop(stdin);

    let mut output = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match timeout(IO_SLICE, stdout.read(&mut buf)).await {
            Err(_elapsed) => continue,
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => output.extend_from_slice(&buf[..n]),
            Ok(Err(e)) => return Err(e).context("failed to read from key command"),
        }
    }

    let status = child.wait().await.context("failed to wait for key command")?;
    if !status.success() {
        bail!("key command exited with {}", status);
    }

    let output = String::from_utf8(output).context("key command output is not UTF-8")?;
    Ok(output.lines().next().unwrap_or("").to_string())
}

/// Check that a captured line really is one base64 curve key before handing
/// it to a key field.
fn looks_like_key(s: &str) -> bool {
    s.len() == KEY_LEN && matches!(base64::decode(s), Ok(raw) if raw.len() == 32)
}

/// `<wg_bin> genkey`: a fresh private key, no input.
pub async fn generate_private_key(wg_bin: &str) -> anyhow::Result<String> {
    let key = run_key_command(&[wg_bin, "genkey"], None).await?;
    if !looks_like_key(&key) {
        bail!("{} genkey returned a malformed key", wg_bin);
    }
    Ok(key)
}

/// `<wg_bin> pubkey`: the public key matching `private_key`, which is fed
/// on the child's stdin.
pub async fn derive_public_key(wg_bin: &str, private_key: &str) -> anyhow::Result<String> {
    let key = run_key_command(&[wg_bin, "pubkey"], Some(private_key)).await?;
    if !looks_like_key(&key) {
        bail!("{} pubkey returned a malformed key", wg_bin);
    }
    Ok(key)
}
