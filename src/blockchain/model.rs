use log::{debug, info};

use super::{Block, ChainError, ProofOfWork};

/// Simple in-memory blockchain with Proof-of-Work.
///
/// Always holds at least the genesis block; blocks are only ever appended.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    pow: ProofOfWork,
}

impl Blockchain {
    /// Initialize a new blockchain with a freshly mined genesis block.
    pub fn new(pow: ProofOfWork) -> Result<Self, ChainError> {
        let genesis = Block::genesis(&pow)?;
        info!(
            "MINER - sealed genesis (hash={}, nonce={})",
            hex::encode(genesis.hash()),
            genesis.nonce()
        );
        Ok(Self {
            chain: vec![genesis],
            pow,
        })
    }

    /// Rebuild a chain from existing blocks, checking genesis, linkage and
    /// every proof along the way.
    pub fn from_blocks(pow: ProofOfWork, blocks: Vec<Block>) -> Result<Self, ChainError> {
        let mut blocks = blocks.into_iter();
        let genesis = blocks.next().ok_or(ChainError::EmptyChain)?;
        if !genesis.is_genesis() {
            return Err(ChainError::BrokenLink {
                expected: String::new(),
                found: hex::encode(genesis.prev_hash()),
            });
        }
        pow.verify(&genesis)?;

        let mut bc = Self {
            chain: vec![genesis],
            pow,
        };
        for block in blocks {
            bc.push_block(block)?;
        }
        Ok(bc)
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Result<&Block, ChainError> {
        self.chain.last().ok_or(ChainError::EmptyChain)
    }

    /// Mine and append a new block with the provided `data`.
    pub fn add_block(&mut self, data: &str) -> Result<&Block, ChainError> {
        let index = self.chain.len();
        let prev_hash = *self.last_block()?.hash();

        let block = Block::new(data.as_bytes(), &prev_hash, &self.pow)?;
        info!(
            "MINER - sealed block #{} (hash={}, nonce={})",
            index,
            hex::encode(block.hash()),
            block.nonce()
        );

        self.chain.push(block);
        self.last_block()
    }

    /// Append a block mined elsewhere. It must link to the current tip and
    /// carry a valid proof.
    pub fn push_block(&mut self, block: Block) -> Result<(), ChainError> {
        let tip = self.last_block()?.hash();
        if block.prev_hash() != tip.as_slice() {
            return Err(ChainError::BrokenLink {
                expected: hex::encode(tip),
                found: hex::encode(block.prev_hash()),
            });
        }
        self.pow.verify(&block)?;

        debug!("CHAIN - appended block #{}", self.chain.len());
        self.chain.push(block);
        Ok(())
    }

    /// Validate the entire chain: linkage, hashes and PoW.
    pub fn is_valid_chain(&self) -> bool {
        let Some((genesis, rest)) = self.chain.split_first() else {
            return false;
        };
        if !genesis.is_genesis() || self.pow.verify(genesis).is_err() {
            return false;
        }

        let mut prev = genesis;
        for current in rest {
            if current.prev_hash() != prev.hash().as_slice() {
                return false;
            }
            if self.pow.verify(current).is_err() {
                return false;
            }
            prev = current;
        }

        true
    }

    /// Whether `block` carries a valid proof under this chain's difficulty.
    pub fn validate(&self, block: &Block) -> bool {
        self.pow.validate(block)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn target_bits(&self) -> u32 {
        self.pow.target_bits()
    }

    /// Export the chain as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ChainError> {
        Ok(serde_json::to_string_pretty(&self.chain)?)
    }

    /// Decode a [`to_json`](Self::to_json) export and rebuild it with
    /// [`from_blocks`](Self::from_blocks).
    pub fn from_json(pow: ProofOfWork, json: &str) -> Result<Self, ChainError> {
        let blocks: Vec<Block> = serde_json::from_str(json)?;
        Self::from_blocks(pow, blocks)
    }
}
