use alloy_primitives::{Address, B256};

/// Shortened checksummed address: `0x1234...abcd`
pub fn shorten_address(address: &Address) -> String {
	let full = address.to_checksum(None);
	format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Block explorer link for a transaction
pub fn tx_link(explorer_url: &str, hash: &B256) -> String {
	format!("{}/tx/{}", explorer_url.trim_end_matches('/'), hash)
}

/// Block explorer link for an address
pub fn address_link(explorer_url: &str, address: &Address) -> String {
	format!("{}/address/{}", explorer_url.trim_end_matches('/'), address)
}
