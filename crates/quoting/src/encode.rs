use crate::selectors::selector;
use ethabi::Token as AbiToken;
use primitive_types::{H160, H256, U256};

fn call(signature: &str, tokens: &[AbiToken]) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend(ethabi::encode(tokens));
    data
}

pub fn v3_quote_exact_input(path: Vec<u8>, amount_in: U256) -> Vec<u8> {
    call(
        "quoteExactInput(bytes,uint256)",
        &[AbiToken::Bytes(path), AbiToken::Uint(amount_in)],
    )
}

pub fn v3_quote_exact_output(path: Vec<u8>, amount_out: U256) -> Vec<u8> {
    call(
        "quoteExactOutput(bytes,uint256)",
        &[AbiToken::Bytes(path), AbiToken::Uint(amount_out)],
    )
}

pub fn v2_get_amounts_out(amount_in: U256, path: &[H160]) -> Vec<u8> {
    call(
        "getAmountsOut(uint256,address[])",
        &[
            AbiToken::Uint(amount_in),
            AbiToken::Array(path.iter().map(|a| AbiToken::Address(*a)).collect()),
        ],
    )
}

pub fn v2_get_amounts_in(amount_out: U256, path: &[H160]) -> Vec<u8> {
    call(
        "getAmountsIn(uint256,address[])",
        &[
            AbiToken::Uint(amount_out),
            AbiToken::Array(path.iter().map(|a| AbiToken::Address(*a)).collect()),
        ],
    )
}

/// One hop of a Balancer-style batch swap: the pool id, the index of the
/// input and output token within the shared `assets` list, and the amount
/// (only the first step of a chained swap carries a nonzero amount — the
/// vault threads each step's output into the next step's input when amount
/// is zero).
pub struct BatchSwapStep {
    pub pool_id: H256,
    pub asset_in_index: usize,
    pub asset_out_index: usize,
    pub amount: U256,
}

/// `queryBatchSwap(GIVEN_IN, steps, assets, funds)`, exact-input only
/// (§4.7). `funds` is a zeroed `FundManagement` tuple since this is a
/// dry-run query, not a real transfer.
pub fn stable_query_batch_swap(steps: &[BatchSwapStep], assets: &[H160]) -> Vec<u8> {
    let swap_kind_given_in = AbiToken::Uint(U256::zero());
    let steps_token = AbiToken::Array(
        steps
            .iter()
            .map(|step| {
                AbiToken::Tuple(vec![
                    AbiToken::FixedBytes(step.pool_id.as_bytes().to_vec()),
                    AbiToken::Uint(U256::from(step.asset_in_index)),
                    AbiToken::Uint(U256::from(step.asset_out_index)),
                    AbiToken::Uint(step.amount),
                    AbiToken::Bytes(Vec::new()),
                ])
            })
            .collect(),
    );
    let assets_token = AbiToken::Array(assets.iter().map(|a| AbiToken::Address(*a)).collect());
    let funds_token = AbiToken::Tuple(vec![
        AbiToken::Address(H160::zero()),
        AbiToken::Bool(false),
        AbiToken::Address(H160::zero()),
        AbiToken::Bool(false),
    ]);
    call(
        "queryBatchSwap(uint8,(bytes32,uint256,uint256,uint256,bytes)[],address[],(address,bool,address,bool))",
        &[swap_kind_given_in, steps_token, assets_token, funds_token],
    )
}
