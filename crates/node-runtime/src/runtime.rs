//! # Node Runtime
//!
//! Wires the deployment config, the persisted state, the identity verifier
//! and the clock into a `WorldSocialToken`, runs one command and persists
//! the result.

use crate::cli::{parse_u256, Command};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_crypto::{EcdsaSignature, Secp256k1KeyPair};
use shared_types::{Address, Classify, Timestamp, TokenEvent, U256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use ws_01_token_ledger::PermitMessage;
use ws_02_identity_verifier::{IdentityProofVerifier, MockProofVerifier, ProofContext, SemaphoreProof};
use ws_03_token_issuance::{
    sign_attestation, DeploymentConfig, IssuanceError, ManualTimeSource, MintRequest,
    SystemTimeSource, TimeSource, TokenIssuanceApi, TokenState, WorldSocialToken,
};

type NodeToken = WorldSocialToken<Box<dyn IdentityProofVerifier>, Box<dyn TimeSource>>;

/// An offline approval plus its signature, as exchanged between
/// `sign-permit` and `permit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPermit {
    /// The approval being granted.
    #[serde(flatten)]
    pub message: PermitMessage,
    /// Holder's signature over the typed-data digest.
    pub signature: EcdsaSignature,
}

/// Executes commands against one deployment and state file.
pub struct NodeRuntime {
    config: DeploymentConfig,
    config_dir: Option<PathBuf>,
    state_path: PathBuf,
    now: Option<Timestamp>,
}

impl NodeRuntime {
    /// Loads the deployment file named on the command line.
    pub fn from_cli(cli: &crate::Cli) -> Result<Self> {
        let config = DeploymentConfig::load(&cli.config)
            .with_context(|| format!("loading deployment config {}", cli.config.display()))?;
        let config_dir = cli.config.parent().map(Path::to_path_buf);
        Ok(Self::new(config, config_dir, cli.state.clone(), cli.now))
    }

    /// Creates a runtime from an already-parsed config.
    ///
    /// `config_dir` anchors relative verifying-key paths; `now` pins the
    /// clock instead of reading system time.
    pub fn new(
        config: DeploymentConfig,
        config_dir: Option<PathBuf>,
        state_path: PathBuf,
        now: Option<Timestamp>,
    ) -> Self {
        Self {
            config,
            config_dir,
            state_path,
            now,
        }
    }

    /// The deployment configuration.
    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Runs `command` and returns its JSON output. State is written back
    /// only after a successful mutating command.
    pub fn execute(&self, command: &Command) -> Result<Value> {
        debug!(mutates = command.mutates(), state = %self.state_path.display(), "Executing command");
        match command {
            Command::Init { force } => self.init(*force),
            Command::Attest {
                key,
                account,
                nullifier,
                root,
                proof,
                mock_proof,
            } => self.attest(key, *account, *nullifier, *root, proof.as_deref(), *mock_proof),
            Command::SignPermit {
                key,
                spender,
                value,
                deadline,
                nonce,
            } => {
                let state = self.load_state()?;
                sign_permit(&state, key, *spender, *value, *deadline, *nonce)
            }
            Command::Balance { account } => {
                let state = self.load_state()?;
                let now = self.clock(&state).now();
                Ok(balance_view(&state, account, now))
            }
            Command::Info => Ok(info_view(&self.load_state()?)),
            Command::Events { since } => {
                let state = self.load_state()?;
                Ok(serde_json::to_value(state.events().since(*since))?)
            }
            transition => self.transition(transition),
        }
    }

    // =========================================================================
    // STATE LIFECYCLE
    // =========================================================================

    fn init(&self, force: bool) -> Result<Value> {
        if self.state_path.exists() && !force {
            bail!(
                "state file {} already exists (use --force to overwrite)",
                self.state_path.display()
            );
        }
        // Fail before writing anything if the verifier cannot be built.
        self.config.verifier.build(self.config_dir.as_deref())?;

        let now = self
            .now
            .unwrap_or_else(|| SystemTimeSource::default().now());
        let params = self.config.genesis_params()?;
        let state = TokenState::genesis(params, now).map_err(rejected)?;
        state
            .save(&self.state_path)
            .with_context(|| format!("writing {}", self.state_path.display()))?;
        info!(state = %self.state_path.display(), now, "Deployment initialized");
        Ok(info_view(&state))
    }

    fn load_state(&self) -> Result<TokenState> {
        TokenState::load(&self.state_path).with_context(|| {
            format!(
                "reading state {} (run `init` first)",
                self.state_path.display()
            )
        })
    }

    fn clock(&self, state: &TokenState) -> Box<dyn TimeSource> {
        match self.now {
            Some(now) => {
                let floor = state.observed_time();
                if now < floor {
                    tracing::warn!(
                        requested = now,
                        floor,
                        "Pinned time precedes committed time, clamping"
                    );
                }
                Box::new(ManualTimeSource::new(now.max(floor)))
            }
            None => Box::new(SystemTimeSource::with_floor(state.observed_time())),
        }
    }

    fn open(&self, state: TokenState) -> Result<NodeToken> {
        let verifier = self.config.verifier.build(self.config_dir.as_deref())?;
        let clock = self.clock(&state);
        Ok(WorldSocialToken::new(state, verifier, clock))
    }

    fn transition(&self, command: &Command) -> Result<Value> {
        let mut token = self.open(self.load_state()?)?;
        let (operation, result) = match command {
            Command::Mint { request } => {
                let request: MintRequest = read_json(request)?;
                ("request_mint", token.request_mint(&request))
            }
            Command::RegisterCreator { caller, account } => (
                "register_creator",
                token.register_creator(&caller.caller, *account),
            ),
            Command::RewardCreator {
                caller,
                account,
                amount,
            } => (
                "reward_creator",
                token.reward_creator(&caller.caller, *account, *amount),
            ),
            Command::RewardViewer {
                caller,
                account,
                amount,
            } => (
                "reward_viewer",
                token.reward_viewer(&caller.caller, *account, *amount),
            ),
            Command::SetAttester { caller, attester } => (
                "set_attester",
                token.set_attester(&caller.caller, *attester),
            ),
            Command::SetAmountPerMint { caller, amount } => (
                "set_amount_per_mint",
                token.set_amount_per_mint(&caller.caller, *amount),
            ),
            Command::SetWaitBetweenMints { caller, seconds } => (
                "set_wait_between_mints",
                token.set_wait_between_mints(&caller.caller, *seconds),
            ),
            Command::SetNullifierEnforcement { caller, enabled } => (
                "set_nullifier_enforcement",
                token.set_nullifier_enforcement(&caller.caller, *enabled),
            ),
            Command::TransferOwnership { caller, new_owner } => (
                "transfer_ownership",
                token.transfer_ownership(&caller.caller, *new_owner),
            ),
            Command::ProposeOwner { caller, candidate } => (
                "propose_owner",
                token.propose_owner(&caller.caller, *candidate),
            ),
            Command::AcceptOwnership { caller } => {
                ("accept_ownership", token.accept_ownership(&caller.caller))
            }
            Command::Transfer { from, to, amount } => {
                ("transfer", token.transfer(*from, *to, *amount))
            }
            Command::Approve {
                owner,
                spender,
                amount,
            } => ("approve", token.approve(*owner, *spender, *amount)),
            Command::TransferFrom {
                spender,
                from,
                to,
                amount,
            } => (
                "transfer_from",
                token.transfer_from(*spender, *from, *to, *amount),
            ),
            Command::Permit { request } => {
                let signed: SignedPermit = read_json(request)?;
                ("permit", token.permit(&signed.message, &signed.signature))
            }
            other => bail!("{other:?} does not change state"),
        };

        let events = result.map_err(rejected)?;
        token
            .into_state()
            .save(&self.state_path)
            .with_context(|| format!("writing {}", self.state_path.display()))?;
        Ok(transition_view(operation, &events))
    }

    // =========================================================================
    // OFFLINE SIGNING
    // =========================================================================

    fn attest(
        &self,
        key: &str,
        account: Address,
        nullifier: U256,
        root: U256,
        proof: Option<&Path>,
        mock_proof: bool,
    ) -> Result<Value> {
        let attester = Secp256k1KeyPair::from_hex(key).context("parsing attester key")?;
        let context = ProofContext::new(&self.config.identity.app_id, &self.config.identity.action);
        let proof = match proof {
            Some(path) if !mock_proof => read_proof(path)?,
            _ => MockProofVerifier::expected_proof(root, &context, &account, nullifier),
        };
        let request = MintRequest {
            account,
            root,
            nullifier,
            proof,
            signature: sign_attestation(&attester, &account, nullifier)?,
        };
        info!(%account, attester = %attester.address(), "Attestation signed");
        Ok(serde_json::to_value(request)?)
    }
}

fn sign_permit(
    state: &TokenState,
    key: &str,
    spender: Address,
    value: U256,
    deadline: U256,
    nonce: Option<U256>,
) -> Result<Value> {
    let holder = Secp256k1KeyPair::from_hex(key).context("parsing holder key")?;
    let owner = holder.address();
    let message = PermitMessage {
        owner,
        spender,
        value,
        nonce: nonce.unwrap_or_else(|| state.ledger().nonces(&owner)),
        deadline,
    };
    let signature = holder.sign_prehash(&state.ledger().permit_digest(&message))?;
    Ok(serde_json::to_value(SignedPermit { message, signature })?)
}

// =============================================================================
// OUTPUT
// =============================================================================

fn transition_view(operation: &str, events: &[TokenEvent]) -> Value {
    json!({
        "operation": operation,
        "events": events,
    })
}

fn balance_view(state: &TokenState, account: &Address, now: Timestamp) -> Value {
    let config = state.config();
    json!({
        "account": account,
        "balance": state.ledger().balance_of(account).to_string(),
        "nonce": state.ledger().nonces(account).to_string(),
        "last_mint": state.registry().last_mint(account),
        "cooldown_remaining": state
            .registry()
            .cooldown_remaining(account, config.wait_between_mints(), now),
        "is_creator": config.is_creator(account),
        "creator_rewards": state.rewards().creator_rewards(account).to_string(),
        "viewer_rewards": state.rewards().viewer_rewards(account).to_string(),
    })
}

fn info_view(state: &TokenState) -> Value {
    let ledger = state.ledger();
    let config = state.config();
    json!({
        "name": ledger.name(),
        "symbol": ledger.symbol(),
        "decimals": ledger.decimals(),
        "total_supply": ledger.total_supply().to_string(),
        "domain_separator": format!("0x{}", hex::encode(ledger.domain_separator())),
        "owner": config.owner(),
        "pending_owner": config.pending_owner(),
        "attester": config.attester(),
        "amount_per_mint": config.amount_per_mint().to_string(),
        "wait_between_mints": config.wait_between_mints(),
        "proof_context": config.proof_context(),
        "enforce_unique_nullifiers": config.enforce_unique_nullifiers(),
        "reward_callers": config.reward_callers(),
        "remainder": config.remainder(),
        "creators": config.creators().collect::<Vec<_>>(),
        "consumed_nullifiers": state.registry().consumed_count(),
        "events": state.events().len(),
        "observed_time": state.observed_time(),
    })
}

// =============================================================================
// FILE INPUT
// =============================================================================

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Reads eight proof words given as decimal or hex strings.
fn read_proof(path: &Path) -> Result<SemaphoreProof> {
    let raw: Vec<String> = read_json(path)?;
    let words = raw
        .iter()
        .map(|word| parse_u256(word).map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;
    SemaphoreProof::from_words(&words).with_context(|| {
        format!(
            "{} must hold exactly {} proof words, found {}",
            path.display(),
            SemaphoreProof::WORDS,
            words.len()
        )
    })
}

/// Keeps the typed error as the cause and leads with its taxonomy.
fn rejected(err: IssuanceError) -> anyhow::Error {
    let summary = format!("rejected ({}): {}", err.kind(), err.reason_code());
    anyhow::Error::new(err).context(summary)
}
