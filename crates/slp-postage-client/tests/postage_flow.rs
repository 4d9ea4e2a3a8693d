//! End-to-end flow: quote documents folded into the cache, best offer
//! selected, stamp count resolved, and the final transaction assembled.

use slp_postage_client::RateCache;
use slp_postage_core::{
    CoinRef, CoinSelection, CoinSource, PostageFeeResolver, PostageQuote, Result, TokenMessage,
    TokenMessageCodec, TransactionAssembler, TxOutput,
};
use std::sync::Arc;

const TOKEN: &str = "deadbeef";

struct WalletStub {
    coin_values: Vec<u64>,
}

impl CoinSource for WalletStub {
    fn select_coins(&self, _token_id: &str, min_token_value: u64) -> Result<CoinSelection> {
        let mut coins = Vec::new();
        let mut total = 0u64;
        for (i, &value) in self.coin_values.iter().enumerate() {
            if total >= min_token_value {
                break;
            }
            coins.push(CoinRef {
                txid: vec![i as u8],
                vout: 0,
                token_value: value,
            });
            total += value;
        }
        assert!(total >= min_token_value, "stub wallet underfunded");
        Ok(CoinSelection {
            coins,
            total_token_value: total,
        })
    }

    fn add_input_info(&self, _coin: &CoinRef) {}
}

/// Codec stub encoding each amount as one byte.
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

fn parse_quote(body: &str) -> PostageQuote {
    serde_json::from_str(body).unwrap()
}

#[test]
fn resolves_and_assembles_against_the_cheapest_host() {
    let cache = Arc::new(RateCache::new());

    // Two post offices quote the token; the dearer one also has the higher
    // weight, but price decides.
    cache.insert_quote(
        "https://dear.example",
        parse_quote(r#"{"weight": 2000, "stamps": [{"tokenId": "deadbeef", "rate": "25"}]}"#),
    );
    cache.insert_quote(
        "https://cheap.example",
        parse_quote(r#"{"weight": 1000, "stamps": [{"tokenId": "deadbeef", "rate": 10}]}"#),
    );
    cache.optimize_rates();

    assert_eq!(
        cache.best_host_url(TOKEN).unwrap(),
        "https://cheap.example/postage"
    );

    let wallet = WalletStub {
        coin_values: vec![2000, 2000],
    };
    let resolver = PostageFeeResolver::new(&wallet);
    let plan = resolver.resolve(cache.as_ref(), TOKEN, 1000).unwrap();

    assert_eq!(plan.stamp_count, 2);
    assert_eq!(plan.postage_amount, 20);
    assert_eq!(plan.amounts, vec![1000, 20, 980]);
    assert!(plan.needs_postage);

    let codec = StubCodec;
    let message_script = codec.build_send_message(TOKEN, &plan.amounts).unwrap();
    let assembler = TransactionAssembler::new(&codec);
    let tx = assembler
        .assemble(
            plan.coins.clone(),
            TxOutput {
                script: message_script,
                value: 0,
            },
            TxOutput {
                script: vec![1],
                value: 546,
            },
            TxOutput {
                script: vec![2],
                value: 546,
            },
            TxOutput {
                script: vec![3],
                value: 546,
            },
        )
        .unwrap();

    // Message, receiver, postage, change.
    assert_eq!(tx.outputs.len(), 4);
    assert_eq!(tx.inputs, plan.coins);
}

#[test]
fn banned_host_loses_the_token_until_unbanned() {
    let cache = Arc::new(RateCache::new());
    cache.insert_quote(
        "https://only.example",
        parse_quote(r#"{"weight": 1000, "stamps": [{"tokenId": "deadbeef", "rate": 10}]}"#),
    );
    cache.optimize_rates();
    assert!(cache.best_quote(TOKEN).is_some());

    cache.ban("https://only.example");
    cache.optimize_rates();

    let wallet = WalletStub {
        coin_values: vec![2000],
    };
    let resolver = PostageFeeResolver::new(&wallet);
    assert!(resolver.resolve(cache.as_ref(), TOKEN, 1000).is_err());

    cache.unban("https://only.example");
    cache.optimize_rates();
    assert!(resolver.resolve(cache.as_ref(), TOKEN, 1000).is_ok());
}
