use itertools::Itertools;
use log::{debug, trace};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::error::ConfigurationError;
use crate::model::SymbolPool;

/// Deals shuffled decks for a board of fixed size from a set of symbol pools.
///
/// All configuration checks happen in [`DeckBuilder::new`], so dealing cannot fail.
#[derive(Debug, Clone)]
pub struct DeckBuilder {
    pools: Vec<SymbolPool>,
    pair_count: usize,
}

impl DeckBuilder {
    pub fn new(pools: Vec<SymbolPool>, slot_count: usize) -> Result<Self, ConfigurationError> {
        let pair_count = pair_count_for_slots(slot_count)?;
        validate_pools(&pools, pair_count)?;
        debug!(
            target: "deck_builder",
            "{} pools, {} slots, {} pairs",
            pools.len(),
            slot_count,
            pair_count
        );
        Ok(Self { pools, pair_count })
    }

    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    pub fn slot_count(&self) -> usize {
        self.pair_count * 2
    }

    pub fn deal<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        shuffled_pairs(&self.pools, self.pair_count, rng)
    }
}

pub fn pair_count_for_slots(slot_count: usize) -> Result<usize, ConfigurationError> {
    if slot_count == 0 {
        return Err(ConfigurationError::EmptyBoard);
    }
    if !slot_count.is_multiple_of(2) {
        return Err(ConfigurationError::OddSlotCount(slot_count));
    }
    Ok(slot_count / 2)
}

fn validate_pools(pools: &[SymbolPool], pair_count: usize) -> Result<(), ConfigurationError> {
    if pools.is_empty() {
        return Err(ConfigurationError::NoPools);
    }
    for (index, pool) in pools.iter().enumerate() {
        if pool.len() < pair_count {
            return Err(ConfigurationError::PoolTooSmall {
                pool: index,
                size: pool.len(),
                pair_count,
            });
        }
        if let Some(symbol) = pool.iter().duplicates().next() {
            return Err(ConfigurationError::DuplicateSymbol {
                pool: index,
                symbol: symbol.clone(),
            });
        }
    }
    Ok(())
}

/// Picks a pool, draws `pair_count` distinct symbols from it, doubles them and shuffles.
/// Every symbol in the result occurs exactly twice.
pub fn build_deck<R: Rng + ?Sized>(
    pools: &[SymbolPool],
    pair_count: usize,
    rng: &mut R,
) -> Result<Vec<String>, ConfigurationError> {
    if pair_count == 0 {
        return Err(ConfigurationError::EmptyBoard);
    }
    validate_pools(pools, pair_count)?;
    Ok(shuffled_pairs(pools, pair_count, rng))
}

fn shuffled_pairs<R: Rng + ?Sized>(
    pools: &[SymbolPool],
    pair_count: usize,
    rng: &mut R,
) -> Vec<String> {
    let Some(pool) = pools.choose(rng) else {
        return Vec::new();
    };

    let mut deck: Vec<String> = pool
        .choose_multiple(rng, pair_count)
        .flat_map(|symbol| [symbol.clone(), symbol.clone()])
        .collect();
    deck.shuffle(rng);
    trace!(target: "deck_builder", "Dealt {:?}", deck);
    deck
}
