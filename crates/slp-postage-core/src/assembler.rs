//! Final output-list construction for postage-bearing transfers.
//!
//! Orders the outputs the way the post office protocol expects: the token
//! message first, then the receiver (or preserved prior outputs), then the
//! postage payment, then token change. Signing and broadcast happen
//! elsewhere; this only shapes the unsigned transaction.

use crate::coins::CoinRef;
use crate::message::{TokenMessage, TokenMessageCodec};
use crate::{Error, Result};

/// A transaction output: locking script plus value in satoshis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    /// Locking script bytes
    pub script: Vec<u8>,
    /// Output value in satoshis
    pub value: u64,
}

/// An unsigned transaction, ready for the signing collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// Funding coins, in selection order
    pub inputs: Vec<CoinRef>,
    /// Ordered outputs; the token message output is always first
    pub outputs: Vec<TxOutput>,
}

/// Builds the ordered output list for a postage-bearing transfer.
pub struct TransactionAssembler<'a, M: TokenMessageCodec> {
    codec: &'a M,
}

impl<'a, M: TokenMessageCodec> TransactionAssembler<'a, M> {
    /// Create an assembler over the wallet's token message codec.
    pub fn new(codec: &'a M) -> Self {
        Self { codec }
    }

    /// Assemble a first-hop postage transfer.
    ///
    /// The message output's own encoding drives the shape: one amount beyond
    /// the receiver's appends the postage output, two append postage then
    /// change.
    pub fn assemble(
        &self,
        coins: Vec<CoinRef>,
        message_output: TxOutput,
        receiver_output: TxOutput,
        postage_output: TxOutput,
        change_output: TxOutput,
    ) -> Result<UnsignedTransaction> {
        let message = self.codec.parse_output_script(&message_output.script)?;
        let extra_amounts = message.output_amount_count().saturating_sub(1);

        let mut outputs = vec![message_output, receiver_output];
        match extra_amounts {
            0 => {}
            1 => outputs.push(postage_output),
            2 => {
                outputs.push(postage_output);
                outputs.push(change_output);
            }
            n => {
                return Err(Error::InvalidMessage(format!(
                    "token message encodes {n} amounts beyond the receiver's"
                )));
            }
        }

        Ok(UnsignedTransaction {
            inputs: coins,
            outputs,
        })
    }

    /// Re-assemble after an incremental re-resolution.
    ///
    /// Prior non-message outputs are carried over verbatim, except a
    /// trailing change output the earlier plan already priced in (detected
    /// by the prior message's amounts exceeding `send_amount`), which the
    /// new plan re-derives. The new message's amount count beyond the
    /// preserved outputs drives the postage/change tail exactly as in the
    /// fresh shape.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble_incremental(
        &self,
        coins: Vec<CoinRef>,
        message_output: TxOutput,
        prior_outputs: &[TxOutput],
        postage_output: TxOutput,
        change_output: TxOutput,
        send_amount: u64,
        prior_message: &TokenMessage,
    ) -> Result<UnsignedTransaction> {
        let message = self.codec.parse_output_script(&message_output.script)?;

        // Skip the prior transaction's own message output.
        let mut preserved: Vec<TxOutput> = prior_outputs.iter().skip(1).cloned().collect();
        let prior_total = prior_message
            .send_amounts()
            .iter()
            .try_fold(0u64, |acc, &a| {
                acc.checked_add(a)
                    .ok_or_else(|| Error::AmountOverflow("prior token amounts".to_string()))
            })?;
        if prior_total > send_amount {
            preserved.pop();
        }

        let extra_amounts = message
            .output_amount_count()
            .saturating_sub(preserved.len());

        let mut outputs = Vec::with_capacity(1 + preserved.len() + 2);
        outputs.push(message_output);
        outputs.extend(preserved);
        match extra_amounts {
            0 => {}
            1 => outputs.push(postage_output),
            2 => {
                outputs.push(postage_output);
                outputs.push(change_output);
            }
            n => {
                return Err(Error::InvalidMessage(format!(
                    "token message encodes {n} amounts beyond the preserved outputs"
                )));
            }
        }

        Ok(UnsignedTransaction {
            inputs: coins,
            outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Codec stub encoding each amount as a single byte.
    struct StubCodec;

    impl TokenMessageCodec for StubCodec {
        fn parse_output_script(&self, script: &[u8]) -> Result<TokenMessage> {
            let mut amounts = vec![0u64];
            amounts.extend(script.iter().map(|&b| u64::from(b)));
            Ok(TokenMessage {
                token_output_amounts: amounts,
            })
        }

        fn build_send_message(&self, _token_id: &str, amounts: &[u64]) -> Result<Vec<u8>> {
            Ok(amounts.iter().map(|&a| a as u8).collect())
        }
    }

    fn output(tag: u8) -> TxOutput {
        TxOutput {
            script: vec![tag],
            value: 546,
        }
    }

    fn message_output(amounts: &[u64]) -> TxOutput {
        TxOutput {
            script: StubCodec.build_send_message("token", amounts).unwrap(),
            value: 0,
        }
    }

    fn coin() -> CoinRef {
        CoinRef {
            txid: vec![1],
            vout: 0,
            token_value: 100,
        }
    }

    #[test]
    fn test_assemble_send_only() {
        let assembler = TransactionAssembler::new(&StubCodec);
        let tx = assembler
            .assemble(
                vec![coin()],
                message_output(&[100]),
                output(1),
                output(2),
                output(3),
            )
            .unwrap();

        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.outputs.len(), 2);
        assert_eq!(tx.outputs[1], output(1));
    }

    #[test]
    fn test_assemble_with_postage() {
        let assembler = TransactionAssembler::new(&StubCodec);
        let tx = assembler
            .assemble(
                vec![coin()],
                message_output(&[100, 20]),
                output(1),
                output(2),
                output(3),
            )
            .unwrap();

        assert_eq!(tx.outputs.len(), 3);
        assert_eq!(tx.outputs[2], output(2));
    }

    #[test]
    fn test_assemble_with_postage_and_change() {
        let assembler = TransactionAssembler::new(&StubCodec);
        let tx = assembler
            .assemble(
                vec![coin()],
                message_output(&[100, 20, 80]),
                output(1),
                output(2),
                output(3),
            )
            .unwrap();

        assert_eq!(tx.outputs.len(), 4);
        assert_eq!(tx.outputs[2], output(2));
        assert_eq!(tx.outputs[3], output(3));
    }

    #[test]
    fn test_assemble_rejects_oversized_message() {
        let assembler = TransactionAssembler::new(&StubCodec);
        let result = assembler.assemble(
            vec![coin()],
            message_output(&[100, 20, 80, 5]),
            output(1),
            output(2),
            output(3),
        );

        assert!(matches!(result, Err(Error::InvalidMessage(_))));
    }

    #[test]
    fn test_incremental_drops_priced_in_change() {
        let assembler = TransactionAssembler::new(&StubCodec);
        // Prior transaction: message, receiver, change; its amounts [100, 50]
        // exceed the 100 being sent, so the change output is stale.
        let prior_outputs = vec![message_output(&[100, 50]), output(1), output(9)];
        let prior_message = StubCodec
            .parse_output_script(&prior_outputs[0].script)
            .unwrap();

        let tx = assembler
            .assemble_incremental(
                vec![coin()],
                message_output(&[100, 20, 30]),
                &prior_outputs,
                output(2),
                output(3),
                100,
                &prior_message,
            )
            .unwrap();

        // Old change output 9 must not reappear next to the new change.
        assert_eq!(tx.outputs.len(), 4);
        assert_eq!(tx.outputs[1], output(1));
        assert_eq!(tx.outputs[2], output(2));
        assert_eq!(tx.outputs[3], output(3));
        assert!(!tx.outputs.contains(&output(9)));
    }

    #[test]
    fn test_incremental_preserves_outputs_without_change() {
        let assembler = TransactionAssembler::new(&StubCodec);
        // Prior amounts sum to the send amount: everything is preserved.
        let prior_outputs = vec![message_output(&[60, 40]), output(1), output(2)];
        let prior_message = StubCodec
            .parse_output_script(&prior_outputs[0].script)
            .unwrap();

        let tx = assembler
            .assemble_incremental(
                vec![coin()],
                message_output(&[60, 40, 15]),
                &prior_outputs,
                output(5),
                output(6),
                100,
                &prior_message,
            )
            .unwrap();

        assert_eq!(tx.outputs.len(), 4);
        assert_eq!(tx.outputs[1], output(1));
        assert_eq!(tx.outputs[2], output(2));
        assert_eq!(tx.outputs[3], output(5));
    }

    #[test]
    fn test_incremental_without_extras() {
        let assembler = TransactionAssembler::new(&StubCodec);
        let prior_outputs = vec![message_output(&[60, 40]), output(1), output(2)];
        let prior_message = StubCodec
            .parse_output_script(&prior_outputs[0].script)
            .unwrap();

        let tx = assembler
            .assemble_incremental(
                vec![coin()],
                message_output(&[60, 40]),
                &prior_outputs,
                output(5),
                output(6),
                100,
                &prior_message,
            )
            .unwrap();

        assert_eq!(tx.outputs.len(), 3);
    }
}
