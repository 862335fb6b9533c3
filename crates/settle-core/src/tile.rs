//! Per-tile vocabulary: landscape, map objects, materials, movables,
//! buildings and the closed set of search types.

use crate::id::{MovableId, PlayerId};
use crate::traits::PathRequester;

/// Maximum number of material units one stack object holds.
pub const MAX_STACK_SIZE: u8 = 8;

/// Terrain type of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LandscapeType {
    /// Default walkable ground.
    #[default]
    Grass,
    /// Bare soil.
    Earth,
    /// Sand.
    Sand,
    /// Desert.
    Desert,
    /// Mountain rock.
    Mountain,
    /// Snow.
    Snow,
    /// Open water.
    Water,
    /// River, narrowest variant.
    River1,
    /// River.
    River2,
    /// River.
    River3,
    /// River, widest variant.
    River4,
}

impl LandscapeType {
    /// Whether this is one of the river variants.
    pub fn is_river(self) -> bool {
        matches!(
            self,
            LandscapeType::River1
                | LandscapeType::River2
                | LandscapeType::River3
                | LandscapeType::River4
        )
    }

    /// Whether this is open water.
    pub fn is_water(self) -> bool {
        self == LandscapeType::Water
    }
}

/// Material carried by bearers and stored in stacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Material {
    /// Tree trunk.
    Trunk,
    /// Sawn plank.
    Plank,
    /// Cut stone.
    Stone,
    /// Harvested crop.
    Crop,
    /// Fish.
    Fish,
    /// Coal.
    Coal,
    /// Iron ore.
    IronOre,
    /// Gold ore.
    GoldOre,
}

/// Discriminant of a [`MapObject`], used for type-based stack queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapObjectType {
    /// Sapling.
    TreeGrowing,
    /// Mature tree, ready to be cut.
    TreeAdult,
    /// Growing corn.
    CornGrowing,
    /// Ripe corn, ready to be cut.
    CornAdult,
    /// Stone deposit.
    Stone,
    /// Material stack.
    Stack,
    /// Building anchor.
    Building,
}

/// An object placed on a tile's object stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapObject {
    /// Sapling.
    TreeGrowing,
    /// Mature tree.
    TreeAdult,
    /// Growing corn.
    CornGrowing,
    /// Ripe corn.
    CornAdult,
    /// Stone deposit with remaining cuts.
    Stone {
        /// Number of cuts left before the stone disappears.
        capacity: u8,
    },
    /// Stack of one material.
    Stack {
        /// Stacked material.
        material: Material,
        /// Units in the stack, `1..=MAX_STACK_SIZE`.
        count: u8,
    },
    /// Building anchored at this tile.
    Building {
        /// Kind of building.
        building_type: BuildingType,
        /// Owning player.
        player: PlayerId,
    },
}

impl MapObject {
    /// The discriminant used by type-based queries.
    pub fn object_type(&self) -> MapObjectType {
        match self {
            MapObject::TreeGrowing => MapObjectType::TreeGrowing,
            MapObject::TreeAdult => MapObjectType::TreeAdult,
            MapObject::CornGrowing => MapObjectType::CornGrowing,
            MapObject::CornAdult => MapObjectType::CornAdult,
            MapObject::Stone { .. } => MapObjectType::Stone,
            MapObject::Stack { .. } => MapObjectType::Stack,
            MapObject::Building { .. } => MapObjectType::Building,
        }
    }
}

/// Kind of a movable unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovableType {
    /// Carries materials between stacks.
    Bearer,
    /// Builds construction sites.
    Bricklayer,
    /// Flattens ground for construction sites.
    Digger,
    /// Cuts trees.
    Lumberjack,
    /// Plants trees.
    Forester,
    /// Cuts stone.
    Stonecutter,
    /// Plants and harvests corn.
    Farmer,
    /// Fishes.
    Fisher,
    /// Fights; may walk on foreign ground.
    Soldier,
}

impl MovableType {
    /// Idle registry category this unit waits in.
    pub fn idle_category(self) -> IdleCategory {
        match self {
            MovableType::Bearer => IdleCategory::Bearer,
            MovableType::Bricklayer => IdleCategory::Bricklayer,
            MovableType::Digger => IdleCategory::Digger,
            _ => IdleCategory::Worker,
        }
    }

    /// Whether pathfinding confines this unit to its player's territory.
    pub fn needs_players_ground(self) -> bool {
        self != MovableType::Soldier
    }
}

/// A movable as recorded on the grid: handle, kind and owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MovableRef {
    /// Handle of the unit.
    pub id: MovableId,
    /// Unit kind.
    pub movable_type: MovableType,
    /// Owning player.
    pub player: PlayerId,
}

impl PathRequester for MovableRef {
    fn player(&self) -> PlayerId {
        self.player
    }

    fn needs_players_ground(&self) -> bool {
        self.movable_type.needs_players_ground()
    }
}

/// Per-partition idle worker registry category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdleCategory {
    /// General material bearer.
    Bearer,
    /// Bricklayer.
    Bricklayer,
    /// Digger.
    Digger,
    /// Any other building worker.
    Worker,
}

impl IdleCategory {
    /// All categories in registry order.
    pub const ALL: [IdleCategory; 4] = [
        IdleCategory::Bearer,
        IdleCategory::Bricklayer,
        IdleCategory::Digger,
        IdleCategory::Worker,
    ];
}

/// Building kinds known to the placement tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildingType {
    /// Lumberjack hut.
    Lumberjack,
    /// Forester hut.
    Forester,
    /// Stonecutter hut.
    Stonecutter,
    /// Fisher hut.
    Fisher,
    /// Farm.
    Farm,
    /// Warehouse.
    Warehouse,
    /// Military tower; occupies surrounding land.
    Tower,
}

const SMALL_FOOTPRINT: &[(i32, i32)] = &[(0, 0), (1, 0), (0, 1), (1, 1)];
const MEDIUM_FOOTPRINT: &[(i32, i32)] = &[
    (0, 0),
    (1, 0),
    (2, 0),
    (0, 1),
    (1, 1),
    (2, 1),
    (1, 2),
    (2, 2),
];
const LARGE_FOOTPRINT: &[(i32, i32)] = &[
    (0, 0),
    (1, 0),
    (2, 0),
    (0, 1),
    (1, 1),
    (2, 1),
    (3, 1),
    (1, 2),
    (2, 2),
    (3, 2),
    (2, 3),
    (3, 3),
];

impl BuildingType {
    /// Tiles covered by the building, relative to its anchor tile.
    pub fn footprint(self) -> &'static [(i32, i32)] {
        match self {
            BuildingType::Lumberjack
            | BuildingType::Forester
            | BuildingType::Stonecutter
            | BuildingType::Fisher => SMALL_FOOTPRINT,
            BuildingType::Warehouse | BuildingType::Tower => MEDIUM_FOOTPRINT,
            BuildingType::Farm => LARGE_FOOTPRINT,
        }
    }

    /// Whether placing the building claims territory around it.
    pub fn is_military(self) -> bool {
        self == BuildingType::Tower
    }
}

/// Closed set of tile predicates used by nearest-match and in-area search.
///
/// Callers select a predicate by value; free-form predicates are not part
/// of the search interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchType {
    /// Unblocked, unmarked ground not owned by the requester.
    ForeignGround,
    /// Own tile whose head object is a mature tree.
    CuttableTree,
    /// Own free grass tile away from blocked and protected tiles.
    PlantableTree,
    /// Own grass/earth tile with no corn on or around it.
    PlantableCorn,
    /// Own tile with ripe corn.
    CuttableCorn,
    /// Own tile with a stone deposit left to cut.
    CuttableStone,
    /// Tile occupied by another player's movable.
    Enemy,
    /// Own river tile.
    River,
    /// Own tile next to open water.
    Fishable,
}

impl SearchType {
    /// All search types.
    pub const ALL: [SearchType; 9] = [
        SearchType::ForeignGround,
        SearchType::CuttableTree,
        SearchType::PlantableTree,
        SearchType::PlantableCorn,
        SearchType::CuttableCorn,
        SearchType::CuttableStone,
        SearchType::Enemy,
        SearchType::River,
        SearchType::Fishable,
    ];

    /// Adversarial search types skip the same-owner precondition.
    pub fn is_adversarial(self) -> bool {
        matches!(self, SearchType::ForeignGround | SearchType::Enemy)
    }
}
