// Consumers of simulation snapshots

pub mod imgstream;
