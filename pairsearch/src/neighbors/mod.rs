//! Search for pairs of particles within a cutoff distance, with optional
//! exclusions and user-defined acceptance criteria.

mod pairs;
pub use self::pairs::{Pair, PairRecord};

mod registry;
pub use self::registry::PairRegistry;

mod exclusions;
pub use self::exclusions::{ExclusionTable, ExclusionsBuilder};

mod parameters;
pub use self::parameters::{SearchParameters, Strategy};

mod cell_list;

mod search;
pub use self::search::NeighborSearch;
