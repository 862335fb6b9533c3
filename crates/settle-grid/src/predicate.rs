//! Search predicates: which tiles fit a [`SearchType`] for a requester.

use settle_core::{LandscapeType, MapObject, MapObjectType, PathRequester, Pos, SearchType};

use crate::layers::GridLayers;

/// Whether `pos` fits `search_type` for `requester`. Pure.
///
/// Every non-adversarial type also requires the tile to belong to the
/// requester's player and not be marked for construction.
pub fn fits_search_type(
    grid: &GridLayers,
    pos: Pos,
    search_type: SearchType,
    requester: &dyn PathRequester,
) -> bool {
    let owner = grid.partitions().owner(pos);
    let own = owner == Some(requester.player());
    let marked = grid.blocked().is_marked(pos);

    match search_type {
        SearchType::ForeignGround => !grid.blocked().is_blocked(pos) && !own && !marked,
        SearchType::Enemy => grid
            .movables()
            .movable_at(pos)
            .is_some_and(|m| m.player != requester.player()),
        _ if !own || marked => false,
        SearchType::CuttableTree => {
            matches!(grid.objects().head(pos), Some(MapObject::TreeAdult))
        }
        SearchType::PlantableTree => is_tree_plantable(grid, pos),
        SearchType::PlantableCorn => is_corn_plantable(grid, pos),
        SearchType::CuttableCorn => grid.objects().has_cuttable(pos, MapObjectType::CornAdult),
        SearchType::CuttableStone => grid.objects().has_cuttable(pos, MapObjectType::Stone),
        SearchType::River => grid.landscape().landscape(pos).is_river(),
        SearchType::Fishable => grid
            .landscape()
            .has_neighbour_landscape(pos, LandscapeType::Water),
    }
}

fn is_tree_plantable(grid: &GridLayers, pos: Pos) -> bool {
    let blocked = grid.blocked();
    grid.landscape().landscape(pos) == LandscapeType::Grass
        && !blocked.is_blocked(pos)
        && !blocked.has_blocked_neighbour(pos)
        && !blocked.is_protected(pos)
        && !blocked.has_protected_neighbour(pos)
        && grid.objects().objects(pos).is_empty()
}

fn is_corn_plantable(grid: &GridLayers, pos: Pos) -> bool {
    let objects = grid.objects();
    let blocked = grid.blocked();
    matches!(
        grid.landscape().landscape(pos),
        LandscapeType::Grass | LandscapeType::Earth
    ) && !blocked.is_protected(pos)
        && !blocked.has_protected_neighbour(pos)
        && [MapObjectType::CornGrowing, MapObjectType::CornAdult]
            .into_iter()
            .all(|t| !objects.has_type(pos, t) && !objects.has_type_in_neighbours(pos, t))
}
