/// Built-in symbol pools. Each game draws one pool, then its pairs from that pool.
pub const ANIMAL_POOLS: [[&str; 12]; 3] = [
    // land
    ["🦁", "🐶", "🤖", "🦊", "🦝", "🐨", "🦄", "🐮", "🐷", "🐸", "🐵", "🐔"],
    // sea
    ["🐙", "🦈", "🐳", "🐬", "🦀", "🦞", "🦐", "🐠", "🐟", "🦑", "🐡", "🦭"],
    // air
    ["🦉", "🦅", "🦇", "🦜", "🐧", "🦢", "🦩", "🐦", "🦤", "🐤", "🐣", "🐚"],
];

pub type SymbolPool = Vec<String>;

pub fn animal_pools() -> Vec<SymbolPool> {
    ANIMAL_POOLS
        .iter()
        .map(|pool| pool.iter().map(|symbol| symbol.to_string()).collect())
        .collect()
}
