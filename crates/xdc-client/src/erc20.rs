//! XRC-20 / ERC-20 call builders.

use alloy_primitives::{Address, U256};

use crate::abi::FunctionCall;

/// `balanceOf(address)`
pub fn balance_of(token: Address, owner: Address) -> FunctionCall {
    FunctionCall::new(token, "balanceOf").arg(owner)
}

/// `transfer(address,uint256)`
pub fn transfer(token: Address, to: Address, amount: U256) -> FunctionCall {
    FunctionCall::new(token, "transfer").arg(to).arg(amount)
}

/// `approve(address,uint256)`
pub fn approve(token: Address, spender: Address, amount: U256) -> FunctionCall {
    FunctionCall::new(token, "approve").arg(spender).arg(amount)
}

/// `allowance(address,address)`
pub fn allowance(token: Address, owner: Address, spender: Address) -> FunctionCall {
    FunctionCall::new(token, "allowance").arg(owner).arg(spender)
}

/// `totalSupply()`
pub fn total_supply(token: Address) -> FunctionCall {
    FunctionCall::new(token, "totalSupply")
}

/// `decimals()`
pub fn decimals(token: Address) -> FunctionCall {
    FunctionCall::new(token, "decimals")
}

/// `symbol()`
pub fn symbol(token: Address) -> FunctionCall {
    FunctionCall::new(token, "symbol")
}

/// `name()`
pub fn name(token: Address) -> FunctionCall {
    FunctionCall::new(token, "name")
}
