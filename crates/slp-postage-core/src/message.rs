//! SLP token message seam.
//!
//! Binary encoding and decoding of the SEND OP_RETURN belong to the host
//! wallet's SLP codec; this crate only reads the decoded amount list.

use crate::Result;

/// Decoded SLP SEND message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMessage {
    /// Token output amounts as encoded on chain. Index 0 corresponds to the
    /// OP_RETURN output itself and is always zero; indices 1.. carry the
    /// real token output amounts.
    pub token_output_amounts: Vec<u64>,
}

impl TokenMessage {
    /// Amounts assigned to real (non-OP_RETURN) outputs.
    pub fn send_amounts(&self) -> &[u64] {
        self.token_output_amounts.get(1..).unwrap_or(&[])
    }

    /// Number of real token outputs the message encodes.
    pub fn output_amount_count(&self) -> usize {
        self.token_output_amounts.len().saturating_sub(1)
    }
}

/// Binary SLP message codec (external collaborator).
pub trait TokenMessageCodec {
    /// Decode a SEND OP_RETURN script.
    fn parse_output_script(&self, script: &[u8]) -> Result<TokenMessage>;

    /// Encode a SEND OP_RETURN script for `token_id` paying `amounts`.
    fn build_send_message(&self, token_id: &str, amounts: &[u64]) -> Result<Vec<u8>>;
}
