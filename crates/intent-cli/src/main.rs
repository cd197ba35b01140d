//! Command-line driver for the intent signer.
//!
//! Builds gasless cross-chain orders from a configuration file, signs them
//! with a local development key and verifies signatures offline. Nothing here
//! talks to a chain: the intent address is supplied by the caller.

use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use intent_config::Config;
use std::path::PathBuf;

mod commands;

use commands::{CliError, FormArgs};

/// Command-line arguments for the intent signer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the EIP-712 typed data for an order
	Build {
		#[command(flatten)]
		form: FormArgs,

		/// Build for this address instead of the configured key
		#[arg(long)]
		user: Option<Address>,
	},
	/// Sign an order with the configured key and print the finalized intent
	Sign {
		#[command(flatten)]
		form: FormArgs,

		/// Intent address returned by the factory for this order
		#[arg(long)]
		intent_address: Address,
	},
	/// Recover the signer of a typed-data JSON file
	Verify {
		/// File holding the typed data as produced by `build`
		#[arg(long)]
		typed_data: PathBuf,

		/// 65-byte signature, hex encoded
		#[arg(long)]
		signature: String,

		/// Address the signature must recover to
		#[arg(long)]
		expected: Address,
	},
	/// List configured networks and tokens
	Networks,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	// Logs go to stderr so stdout stays parseable JSON.
	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or_else(|| format!("Invalid config path: {}", args.config.display()))?;
	let config = Config::from_file(config_path).await?;
	tracing::info!(networks = config.networks.len(), "Loaded configuration");

	let output = run(args.command, &config).await.inspect_err(|e| {
		if let CliError::Intent(err) = e {
			tracing::error!(
				error = %err,
				retryable = err.is_retryable(),
				invalid_input = err.is_validation(),
				"Command failed"
			);
		}
	})?;

	println!("{}", output);
	Ok(())
}

/// Runs one subcommand and returns what it prints.
async fn run(command: Command, config: &Config) -> Result<String, CliError> {
	let output = match command {
		Command::Build { form, user } => commands::build(config, &form, user).await?,
		Command::Sign {
			form,
			intent_address,
		} => commands::sign(config, &form, intent_address).await?,
		Command::Verify {
			typed_data,
			signature,
			expected,
		} => {
			let json = tokio::fs::read_to_string(&typed_data).await?;
			match commands::verify(&json, &signature, expected).await {
				Ok(report) => serde_json::to_string_pretty(&report)?,
				Err(CliError::SignerMismatch(report)) => {
					// The report still goes to stdout; the exit status carries the failure.
					println!("{}", serde_json::to_string_pretty(&report)?);
					tracing::error!(
						expected = %report.expected_address,
						recovered = %report.recovered_address,
						"Signature does not match the expected signer"
					);
					return Err(CliError::SignerMismatch(report));
				},
				Err(e) => return Err(e),
			}
		},
		Command::Networks => serde_json::to_string_pretty(&commands::networks(config))?,
	};
	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;
	use intent_types::DeadlinePreference;

	#[test]
	fn test_args_definition() {
		Args::command().debug_assert();
	}

	#[test]
	fn test_parse_build() {
		let args = Args::try_parse_from([
			"intent-cli",
			"--config",
			"custom.toml",
			"build",
			"--demo",
			"--deadline",
			"fast",
			"--user",
			"0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
		])
		.unwrap();

		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "info");
		let Command::Build { form, user } = args.command else {
			panic!("expected build");
		};
		assert!(form.demo);
		assert_eq!(form.deadline, Some(DeadlinePreference::Fast));
		assert!(user.is_some());
	}

	#[test]
	fn test_custom_deadlines_come_in_pairs() {
		let result = Args::try_parse_from([
			"intent-cli",
			"sign",
			"--intent-address",
			"0x3333333333333333333333333333333333333333",
			"--open-deadline",
			"1700000100",
		]);
		assert!(result.is_err());
	}

	#[test]
	fn test_parse_verify() {
		let args = Args::try_parse_from([
			"intent-cli",
			"-l",
			"debug",
			"verify",
			"--typed-data",
			"order.json",
			"--signature",
			"0x00",
			"--expected",
			"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
		])
		.unwrap();
		assert_eq!(args.log_level, "debug");
		assert!(matches!(args.command, Command::Verify { .. }));
	}

	#[tokio::test]
	async fn test_verify_mismatch_fails_the_command() {
		use alloy_primitives::address;
		use intent_config::builders::ConfigBuilder;
		use intent_core::FinalizedIntent;

		let config = ConfigBuilder::new()
			.private_key("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
			.build();
		let form = FormArgs {
			demo: true,
			..FormArgs::default()
		};
		let intent_address = address!("0x3333333333333333333333333333333333333333");
		let signed = run(
			Command::Sign {
				form,
				intent_address,
			},
			&config,
		)
		.await
		.unwrap();
		let finalized: FinalizedIntent = serde_json::from_str(&signed).unwrap();

		let payload = intent_order::TypedDataSchema::new(
			config.intent.domain_name.clone(),
			config.intent.domain_version.clone(),
			config.networks.clone(),
		)
		.derive(&finalized.order.with_intent_address(Address::ZERO))
		.unwrap();
		let temp_dir = tempfile::tempdir().unwrap();
		let typed_data = temp_dir.path().join("order.json");
		std::fs::write(&typed_data, payload.to_json().unwrap()).unwrap();

		let verify = |expected: Address| Command::Verify {
			typed_data: typed_data.clone(),
			signature: finalized.signature.to_string(),
			expected,
		};

		let output = run(verify(finalized.user_address), &config).await.unwrap();
		assert!(output.contains("\"matches\": true"));

		let other = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
		let err = run(verify(other), &config).await.unwrap_err();
		assert!(matches!(err, CliError::SignerMismatch(ref report) if !report.matches));
		assert!(err.to_string().contains("expected 0x70997970C51812dc3A010C7d01b50e0d17dc79C8"));
	}
}
