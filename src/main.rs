mod blockchain;
mod config;

use dotenvy::dotenv;
use log::{debug, error, info, warn};
use std::process::ExitCode;

use blockchain::{Blockchain, ChainError, ProofOfWork};
use config::Config;

/// Payloads appended after the genesis block.
const DEMO_PAYLOADS: [&str; 3] = [
    "Send 1 MBX to Edward",
    "Send 3 MBX to Lucia",
    "Send 5 MBX to Awn",
];

fn main() -> ExitCode {
    let _ = dotenv();
    env_logger::init();

    match run(Config::from_env()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<(), ChainError> {
    if config.overrides_difficulty() {
        warn!(
            "TARGET_BITS={} overrides the compiled {}-bit difficulty",
            config.target_bits,
            blockchain::TARGET_BITS
        );
    }
    let pow = ProofOfWork::new(config.target_bits)?;
    info!(
        "⛓️ Mining with {}-bit target (nonce bound {})",
        pow.target_bits(),
        pow.max_nonce()
    );
    debug!("target {}", hex::encode(pow.target().to_be_bytes()));

    let mut bc = Blockchain::new(pow)?;
    for data in DEMO_PAYLOADS {
        bc.add_block(data)?;
    }

    for block in bc.blocks() {
        println!("Prev. hash: {}", hex::encode(block.prev_hash()));
        println!("Data: {}", String::from_utf8_lossy(block.data()));
        println!("Hash: {}", hex::encode(block.hash()));
        println!("PoW: {}", bc.validate(block));
        println!();
    }

    info!(
        "chain of {} blocks at {} bits, valid={}",
        bc.len(),
        bc.target_bits(),
        bc.is_valid_chain()
    );
    let restored = reload(&bc)?;
    info!("re-imported {} blocks from JSON export", restored.len());

    Ok(())
}

/// Round-trip `bc` through its JSON export, re-checking every link and proof.
fn reload(bc: &Blockchain) -> Result<Blockchain, ChainError> {
    let json = bc.to_json()?;
    debug!("chain export:\n{json}");
    Blockchain::from_json(ProofOfWork::new(bc.target_bits())?, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_chain_survives_reload() {
        let mut bc = Blockchain::new(ProofOfWork::new(8).unwrap()).unwrap();
        for data in DEMO_PAYLOADS {
            bc.add_block(data).unwrap();
        }

        let restored = reload(&bc).unwrap();
        assert_eq!(restored.len(), 4);
        assert_eq!(restored.blocks(), bc.blocks());
        assert!(restored.is_valid_chain());
    }
}
