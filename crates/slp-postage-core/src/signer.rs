//! Signing collaborator seam.
//!
//! A postage transaction leaves the wallet incomplete: the wallet signs its
//! own token inputs and the post office adds its stamp inputs before
//! broadcast. Key management and signature production live in the host
//! wallet; this crate only defines the handoff interface.

use crate::assembler::UnsignedTransaction;
use crate::Result;

/// External signer for postage transactions.
pub trait PostageSigner {
    /// Sign the wallet's inputs, leaving the transaction incomplete for the
    /// post office to finish and broadcast.
    fn sign_for_post_office(&self, tx: &UnsignedTransaction) -> Result<Vec<u8>>;

    /// Sign the wallet's inputs for a payment-request flow, where the post
    /// office settles an invoice on the sender's behalf.
    fn sign_from_payment_request(
        &self,
        tx: &UnsignedTransaction,
        payment_request: &[u8],
    ) -> Result<Vec<u8>>;
}
