use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    // Access and pause gating
    #[msg("Ownable: caller is not the owner")]
    Unauthorized,

    #[msg("Pausable: paused")]
    Paused,

    #[msg("Pausable: not paused")]
    NotPaused,

    #[msg("Ownable: new owner is the zero address")]
    ZeroOwner,

    // Deposits
    #[msg("amount is too small")]
    AmountTooSmall,

    #[msg("wrong value")]
    WrongValue,

    // Investment records
    #[msg("investment non-exists")]
    InvestmentNonExists,

    #[msg("investment not active")]
    InvestmentNotActive,

    #[msg("rebalance not enabled")]
    RebalanceNotEnabled,

    #[msg("investment index out of bounds")]
    InvestmentIndexOutOfBounds,

    // Pool parameters
    #[msg("new fee address is address(0)")]
    ZeroFeeAddress,

    #[msg("this address is already set")]
    FeeAddressAlreadySet,

    #[msg("this fee is already set")]
    FeeAlreadySet,

    #[msg("new invest fee is too big")]
    InvestFeeTooBig,

    #[msg("new success fee is too big")]
    SuccessFeeTooBig,

    #[msg("new min invest is zero")]
    ZeroMinInvest,

    #[msg("distribution must be eq 100")]
    DistributionSumMismatch,

    #[msg("distribution length must match the token list")]
    DistributionLengthMismatch,

    #[msg("pool name must be 1-32 bytes")]
    InvalidPoolName,

    #[msg("pool must hold between 1 and 8 tokens")]
    InvalidTokenCount,

    #[msg("pool token listed twice")]
    DuplicatePoolToken,

    #[msg("native wrap asset does not match the entry asset")]
    InvalidNativeWrap,

    // Swaps and settlement
    #[msg("min amounts must be empty or one per pool token")]
    InvalidMinAmounts,

    #[msg("swap output below minimum")]
    SlippageExceeded,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Swap router does not match the pool")]
    InvalidSwapRouter,

    #[msg("Swap settled outside the requested amounts")]
    InvalidSwapSettlement,

    #[msg("Invalid remaining accounts layout")]
    InvalidRemainingAccounts,

    #[msg("Invalid pool vault")]
    InvalidVault,

    #[msg("Mint is not used by this pool")]
    InvalidVaultMint,

    #[msg("Token account required for non-native transfers")]
    MissingTokenAccount,

    #[msg("Wrapped native mint account required")]
    MissingNativeMint,

    #[msg("Invalid unwrap account")]
    InvalidUnwrapAccount,

    #[msg("Fee recipient does not match the pool")]
    InvalidFeeRecipient,
}
