//! Deployment constants: chain, contracts, featured badges

use crate::core::types::Badge;
use once_cell::sync::Lazy;

/// Chain the profile contracts are deployed on.
pub const CHAIN_ID: u64 = 137;

/// RPC endpoint offered to the wallet when it does not know `CHAIN_ID`.
pub const RPC_URL: &str = "https://goerli.infura.io/v3/";

/// Link3 ProfileNFT contract.
pub const PROFILE_NFT_CONTRACT: &str = "0x2723522702093601e6360cae665518c4f63e9da6";

pub const PROFILE_NFT_OPERATOR: &str = "0xC5633f7E465eBB1A9F855F93047134ef1ca61E49";

pub const DOMAIN: &str = "social.thirdy.xyz";

/// CyberConnect indexer endpoint.
pub const INDEXER_URL: &str = "https://api.cyberconnect.dev/";

/// Badges shown to every visitor regardless of wallet.
pub static FEATURED_BADGES: Lazy<Vec<Badge>> = Lazy::new(|| {
    vec![
        Badge::new(4, "https://cyberconnect.mypinata.cloud/ipfs/QmS4vgKoaHvYyUpNNYso1mMf5hweBHfkM2pDDWy4SsDTc1")
            .with_creator(15, "QmRiyArHF4abhXo4pdKVQj3fVg6jLvcnH4DitVijuTaoyq"),
        Badge::new(13, "https://cyberconnect.mypinata.cloud/ipfs/QmQiiAsGHZaCRvLcYy7CjuP1aX3Qee8FMh5YHxG1HXwSDY")
            .with_creator(44, "QmUoU9be1DGKUiVwEjvbw9dMRrRNK4TX7A57YL4NBe4hQa"),
        Badge::new(15, "https://cyberconnect.mypinata.cloud/ipfs/QmedVZGUJtQwQ17h3VF2TqnuWr66sENcUccQGDgYucyWQW")
            .with_creator(44, "QmUoU9be1DGKUiVwEjvbw9dMRrRNK4TX7A57YL4NBe4hQa"),
    ]
});
