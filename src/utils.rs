//! Id minting helpers

use bech32::Bech32m;
use uuid7::uuid7;

// mint a fresh uuid7 and encode it with a human-readable prefix
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}
