//! Command definitions and handlers
//!
//! Every mutating command follows the same shape: load the state file,
//! apply one ledger operation with the role table as the access authority,
//! then persist the resulting snapshot. Events produced by the operation
//! are logged for the operator.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lib_ledger::{
    AuthoritySet, EventSink, Ledger, LedgerEvent, Role,
};
use lib_types::{Address, Amount};

use crate::error::{CliError, CliResult};
use crate::state;

/// Wrapped Anatha ledger administration
#[derive(Parser, Debug)]
#[command(name = "anatha-cli", version, about)]
pub struct Cli {
    /// Path to the ledger state file
    #[arg(long, global = true, default_value = "anatha-state.json")]
    pub state: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deploy a fresh ledger: initialize with the multisig as holder, then
    /// hand administration over and renounce the deployer's roles
    Init {
        /// Deploying account (receives roles transiently, renounces them)
        #[arg(long)]
        deployer: Address,
        /// Multisig that ends up holding the supply and the admin role
        #[arg(long)]
        multisig: Address,
    },

    /// Show ledger metadata and supply
    Info,

    /// Show an account balance
    Balance { account: Address },

    /// Show the remaining allowance from an owner to a spender
    Allowance { owner: Address, spender: Address },

    /// Move tokens between accounts
    Transfer {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: Amount,
    },

    /// Set an absolute allowance
    Approve {
        #[arg(long)]
        owner: Address,
        #[arg(long)]
        spender: Address,
        #[arg(long)]
        amount: Amount,
    },

    /// Raise an allowance by a delta
    IncreaseAllowance {
        #[arg(long)]
        owner: Address,
        #[arg(long)]
        spender: Address,
        #[arg(long)]
        delta: Amount,
    },

    /// Lower an allowance by a delta (to zero revokes it)
    DecreaseAllowance {
        #[arg(long)]
        owner: Address,
        #[arg(long)]
        spender: Address,
        #[arg(long)]
        delta: Amount,
    },

    /// Move tokens on an owner's behalf, spending the caller's allowance
    TransferFrom {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        from: Address,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: Amount,
    },

    /// Mint new tokens (caller must hold the minter role)
    Mint {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        amount: Amount,
    },

    /// Burn tokens from the owner's own balance
    Burn {
        #[arg(long)]
        owner: Address,
        #[arg(long)]
        amount: Amount,
    },

    /// Burn an owner's tokens, spending the caller's allowance
    BurnFrom {
        #[arg(long)]
        caller: Address,
        #[arg(long)]
        owner: Address,
        #[arg(long)]
        amount: Amount,
    },

    /// Engage the pause gate (caller must hold the pauser role)
    Pause {
        #[arg(long)]
        caller: Address,
    },

    /// Release the pause gate (caller must hold the pauser role)
    Unpause {
        #[arg(long)]
        caller: Address,
    },

    /// Grant a role to an account
    GrantRole { role: Role, account: Address },

    /// Remove a role from an account
    RenounceRole { role: Role, account: Address },

    /// Rewrite the state file's snapshot at the current format version
    Migrate,
}

/// Sink logging every ledger event for the operator
struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: LedgerEvent) -> anyhow::Result<()> {
        tracing::info!("{}", event);
        Ok(())
    }
}

/// Dispatch a parsed invocation
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Init { deployer, multisig } => init(&cli.state, deployer, multisig),
        Command::Info => info(&cli.state),
        Command::Balance { account } => {
            let (ledger, _) = state::load(&cli.state)?;
            println!("{}", ledger.balance_of(&account));
            Ok(())
        }
        Command::Allowance { owner, spender } => {
            let (ledger, _) = state::load(&cli.state)?;
            println!("{}", ledger.allowance(&owner, &spender));
            Ok(())
        }
        Command::Transfer { from, to, amount } => {
            with_ledger(&cli.state, |ledger, _, sink| {
                ledger.transfer(sink, from, to, amount)
            })
        }
        Command::Approve {
            owner,
            spender,
            amount,
        } => with_ledger(&cli.state, |ledger, _, sink| {
            ledger.approve(sink, owner, spender, amount)
        }),
        Command::IncreaseAllowance {
            owner,
            spender,
            delta,
        } => with_ledger(&cli.state, |ledger, _, sink| {
            ledger.increase_allowance(sink, owner, spender, delta).map(|_| ())
        }),
        Command::DecreaseAllowance {
            owner,
            spender,
            delta,
        } => with_ledger(&cli.state, |ledger, _, sink| {
            ledger.decrease_allowance(sink, owner, spender, delta).map(|_| ())
        }),
        Command::TransferFrom {
            caller,
            from,
            to,
            amount,
        } => with_ledger(&cli.state, |ledger, _, sink| {
            ledger.transfer_from(sink, caller, from, to, amount)
        }),
        Command::Mint { caller, to, amount } => with_ledger(&cli.state, |ledger, roles, sink| {
            ledger.mint(roles, sink, caller, to, amount)
        }),
        Command::Burn { owner, amount } => with_ledger(&cli.state, |ledger, _, sink| {
            ledger.burn(sink, owner, amount)
        }),
        Command::BurnFrom {
            caller,
            owner,
            amount,
        } => with_ledger(&cli.state, |ledger, _, sink| {
            ledger.burn_from(sink, caller, owner, amount)
        }),
        Command::Pause { caller } => with_ledger(&cli.state, |ledger, roles, sink| {
            ledger.pause(roles, sink, caller)
        }),
        Command::Unpause { caller } => with_ledger(&cli.state, |ledger, roles, sink| {
            ledger.unpause(roles, sink, caller)
        }),
        Command::GrantRole { role, account } => {
            let (ledger, mut roles) = state::load(&cli.state)?;
            roles.grant(role, account);
            tracing::info!("granted {} to {}", role, account);
            state::save(&cli.state, &ledger, &roles)
        }
        Command::RenounceRole { role, account } => {
            let (ledger, mut roles) = state::load(&cli.state)?;
            roles.renounce(role, &account);
            tracing::info!("renounced {} for {}", role, account);
            state::save(&cli.state, &ledger, &roles)
        }
        Command::Migrate => {
            // load() already migrates and verifies; saving rewrites the file
            // at the current format version
            let (ledger, roles) = state::load(&cli.state)?;
            state::save(&cli.state, &ledger, &roles)?;
            tracing::info!("state file rewritten at the current snapshot version");
            Ok(())
        }
    }
}

/// Deploy flow: the deployer initializes with the multisig as initial
/// holder, then renounces its transient roles and hands admin to the
/// multisig.
fn init(path: &std::path::Path, deployer: Address, multisig: Address) -> CliResult<()> {
    if path.exists() {
        return Err(CliError::StateExists(path.to_path_buf()));
    }

    let mut roles = AuthoritySet::new();
    roles.grant(Role::Admin, deployer);
    roles.grant(Role::Minter, deployer);
    roles.grant(Role::Pauser, deployer);

    let mut ledger = Ledger::new();
    ledger.initialize(multisig, &mut LogSink)?;
    tracing::info!("ledger initialized, supply held by {}", multisig);

    // Renounce default roles
    roles.renounce(Role::Pauser, &deployer);
    roles.renounce(Role::Minter, &deployer);

    // Hand administration to the multisig, then step down
    roles.grant(Role::Admin, multisig);
    roles.renounce(Role::Admin, &deployer);
    tracing::info!("admin role transferred to {}", multisig);

    state::save(path, &ledger, &roles)
}

fn info(path: &std::path::Path) -> CliResult<()> {
    let (ledger, roles) = state::load(path)?;
    println!("name:         {}", ledger.name());
    println!("symbol:       {}", ledger.symbol());
    println!("decimals:     {}", ledger.decimals());
    println!("total supply: {}", ledger.total_supply());
    println!("paused:       {}", ledger.is_paused());
    println!("holders:      {}", ledger.balances().count());
    for role in [Role::Admin, Role::Minter, Role::Pauser] {
        let members: Vec<String> = roles.addresses(role).map(|a| a.to_string()).collect();
        println!("{:<9} {}", format!("{}:", role), members.join(", "));
    }
    Ok(())
}

/// Load, apply one mutating operation, persist
fn with_ledger<F>(path: &std::path::Path, op: F) -> CliResult<()>
where
    F: FnOnce(&mut Ledger, &AuthoritySet, &mut dyn EventSink) -> lib_ledger::LedgerResult<()>,
{
    let (mut ledger, roles) = state::load(path)?;
    op(&mut ledger, &roles, &mut LogSink)?;
    state::save(path, &ledger, &roles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_ledger::INITIAL_SUPPLY;

    fn deployer() -> Address {
        Address::new([0xDE; 32])
    }

    fn multisig() -> Address {
        Address::new([0x15; 32])
    }

    #[test]
    fn init_runs_the_deploy_flow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anatha-state.json");

        init(&path, deployer(), multisig()).unwrap();
        let (ledger, roles) = state::load(&path).unwrap();

        // Supply and administration end with the multisig
        assert_eq!(ledger.balance_of(&multisig()), INITIAL_SUPPLY);
        assert!(roles.has_role(Role::Admin, &multisig()));

        // The deployer keeps nothing
        assert_eq!(ledger.balance_of(&deployer()), 0);
        assert!(!roles.has_role(Role::Admin, &deployer()));
        assert!(!roles.has_role(Role::Minter, &deployer()));
        assert!(!roles.has_role(Role::Pauser, &deployer()));
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anatha-state.json");
        init(&path, deployer(), multisig()).unwrap();

        let result = init(&path, deployer(), multisig());
        assert!(matches!(result, Err(CliError::StateExists(_))));
    }

    #[test]
    fn mutating_command_round_trips_through_the_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anatha-state.json");
        init(&path, deployer(), multisig()).unwrap();

        let to = Address::new([0x22; 32]);
        with_ledger(&path, |ledger, _, sink| {
            ledger.transfer(sink, multisig(), to, 1_000)
        })
        .unwrap();

        let (ledger, _) = state::load(&path).unwrap();
        assert_eq!(ledger.balance_of(&to), 1_000);
        assert_eq!(ledger.balance_of(&multisig()), INITIAL_SUPPLY - 1_000);
    }

    #[test]
    fn failed_operation_leaves_the_state_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anatha-state.json");
        init(&path, deployer(), multisig()).unwrap();

        let result = with_ledger(&path, |ledger, _, sink| {
            ledger.transfer(sink, deployer(), multisig(), 1)
        });
        assert!(result.is_err());

        let (ledger, _) = state::load(&path).unwrap();
        assert_eq!(ledger.balance_of(&multisig()), INITIAL_SUPPLY);
    }
}
