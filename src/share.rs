//! Share codec: a modpack selection as a URL-safe token.
//!
//! A reduced selection summary is folded into a compact positional
//! record, deflate-compressed, and base64url-encoded so a whole pack
//! fits in one query parameter. Nothing is stored server-side; the
//! link is the pack. Decoding is total: any malformed token yields
//! `None`, never an error, since stale or hand-edited links are an
//! expected user condition.

use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::Deserialize;
use url::Url;

use crate::model::{Loader, Platform};

/// Query parameter the token travels in.
pub const SHARE_QUERY_PARAM: &str = "pack";

/// Reduced selection summary carried by a share token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareState {
    pub name: String,
    pub game_version: String,
    pub loader: Loader,
    pub mods: Vec<ShareRef>,
}

/// Minimal reference to one selected mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRef {
    pub mod_id: String,
    pub platform: Platform,
    pub version_id: String,
}

/// Wire record with single-letter field names; the platform collapses
/// to its one-character tag.
#[derive(Debug, Deserialize)]
struct WireState {
    n: String,
    mc: String,
    l: Loader,
    m: Vec<WireRef>,
}

#[derive(Debug, Deserialize)]
struct WireRef {
    i: String,
    s: char,
    v: String,
}

/// Encode a selection into a URL-safe token.
pub fn encode(state: &ShareState) -> String {
    let refs: Vec<serde_json::Value> = state
        .mods
        .iter()
        .map(|m| {
            serde_json::json!({
                "i": m.mod_id,
                "s": m.platform.share_tag(),
                "v": m.version_id,
            })
        })
        .collect();
    let record = serde_json::json!({
        "n": state.name,
        "mc": state.game_version,
        "l": state.loader,
        "m": refs,
    });

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(record.to_string().as_bytes())
        .and_then(|_| encoder.finish())
        .map(|compressed| URL_SAFE_NO_PAD.encode(compressed))
        .expect("deflate into an in-memory buffer cannot fail")
}

/// Decode a token back into a selection. Returns `None` for any
/// malformed input: bad base64, corrupt deflate stream, unexpected
/// JSON shape, or an unknown platform tag.
pub fn decode(token: &str) -> Option<ShareState> {
    let compressed = URL_SAFE_NO_PAD.decode(token).ok()?;

    let mut json = String::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_string(&mut json)
        .ok()?;

    let wire: WireState = serde_json::from_str(&json).ok()?;

    let mods = wire
        .m
        .into_iter()
        .map(|r| {
            Some(ShareRef {
                mod_id: r.i,
                platform: Platform::from_share_tag(r.s)?,
                version_id: r.v,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(ShareState {
        name: wire.n,
        game_version: wire.mc,
        loader: wire.l,
        mods,
    })
}

/// Put the token on an application URL, replacing any previous one.
pub fn share_url(base: &Url, state: &ShareState) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != SHARE_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(SHARE_QUERY_PARAM, &encode(state));
    }
    url
}

/// Read the selection back off an application URL, typically once at
/// load. `None` when the parameter is absent or the token is bad.
pub fn read_share_url(url: &Url) -> Option<ShareState> {
    let token = url
        .query_pairs()
        .find(|(key, _)| key == SHARE_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())?;
    decode(&token)
}
