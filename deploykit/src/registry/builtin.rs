//! Compiled-in contract addresses

use super::ChainId;

/// Previously deployed liquidity controller
pub const LIQUIDITY_CONTROLLER: &str = "LiquidityController";
/// Uniswap v3 NonfungiblePositionManager
pub const POSITION_MANAGER: &str = "NonFungiblePositionManager";
/// Uniswap v3 SwapRouter
pub const SWAP_ROUTER: &str = "SwapRouter";

/// Keys every built-in chain record must provide
pub const REQUIRED_KEYS: [&str; 3] = [LIQUIDITY_CONTROLLER, POSITION_MANAGER, SWAP_ROUTER];

const POLYGON: &[(&str, &str)] = &[
    (LIQUIDITY_CONTROLLER, "0x10A0DDB46361b3F1d6405eFffc1Db96771bAb85F"),
    (POSITION_MANAGER, "0xC36442b4a4522E871399CD717aBDD847Ab11FE88"),
    (SWAP_ROUTER, "0xE592427A0AEce92De3Edee1F18E0157C05861564"),
    // tokens
    ("zchf", "0x02567e4b14b25549331fCEe2B56c647A8bAB16FD"),
    ("usdt", "0xc2132D05D31c914a87C6611C10748AEb04B58e8F"),
];

/// Every chain the built-in registry knows about
pub const BUILTIN_CHAINS: &[(ChainId, &[(&str, &str)])] = &[(ChainId::POLYGON, POLYGON)];
