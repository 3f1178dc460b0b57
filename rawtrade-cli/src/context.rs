use std::sync::Arc;

use alloy_signer_local::PrivateKeySigner;
use rawtrade_client::rpc::RpcTransport;
use rawtrade_client::{ContractAdapter, Session};

use crate::config::CliConfig;
use crate::error::CliError;
use crate::format::spinner;
use crate::signer::{configured_signer, load_signer};

/// A connected session plus the configuration it was built from.
pub struct Context {
    pub config: CliConfig,
    pub session: Session,
}

impl Context {
    /// Connect with the user's signing key, prompting for it if needed.
    pub async fn signing(config: CliConfig) -> Result<Self, CliError> {
        let signer = load_signer(&config)?;
        Self::connect(config, signer).await
    }

    /// Connect for public reads. Uses the user's key when one is configured,
    /// otherwise a throwaway identity: reads never sign anything.
    pub async fn read_only(config: CliConfig) -> Result<Self, CliError> {
        let signer = match configured_signer(&config)? {
            Some(s) => s,
            None => PrivateKeySigner::random(),
        };
        Self::connect(config, signer).await
    }

    async fn connect(config: CliConfig, signer: PrivateKeySigner) -> Result<Self, CliError> {
        let transport = RpcTransport::new(&config.rpc_settings(), signer)?;
        let session = Session::new(config.network.chain_id);
        let pb = spinner(&format!("Connecting to {}...", config.network.chain_name));
        let result = session.connect(Arc::new(transport)).await;
        pb.finish_and_clear();
        result?;
        Ok(Self { config, session })
    }

    pub fn adapter(&self) -> &ContractAdapter {
        self.session.adapter()
    }
}
