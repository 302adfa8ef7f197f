//! Static catalog of selectable map sectors.
//!
//! Each entry pairs a stable id (persisted in settings) with the display
//! name shown in the sector picker and the tile image file name.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A single selectable sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    pub file_name: &'static str,
}

impl MapEntry {
    pub const fn new(
        id: &'static str,
        display_name: &'static str,
        file_name: &'static str,
    ) -> Self {
        Self {
            id,
            display_name,
            file_name,
        }
    }
}

const BUILTIN_MAPS: &[MapEntry] = &[
    MapEntry::new("acrithia", "Acrithia", "MapAcrithiaHex.png"),
    MapEntry::new("allods_bight", "Allod's Bight", "MapAllodsBightHex.png"),
    MapEntry::new("ash_fields", "Ash Fields", "MapAshFieldsHex.png"),
    MapEntry::new("basin_sionnach", "Basin Sionnach", "MapBasinSionnachHex.png"),
    MapEntry::new("callahans_passage", "Callahan's Passage", "MapCallahansPassageHex.png"),
    MapEntry::new("callums_cape", "Callum's Cape", "MapCallumsCapeHex.png"),
    MapEntry::new("clahstra", "Clahstra", "MapClahstraHexMap.png"),
    MapEntry::new("clanshead_valley", "Clanshead Valley", "MapClansheadValleyHex.png"),
    MapEntry::new("deadlands", "Deadlands", "MapDeadlandsHex.png"),
    MapEntry::new("drowned_vale", "Drowned Vale", "MapDrownedValeHex.png"),
    MapEntry::new("endless_shore", "Endless Shore", "MapEndlessShoreHex.png"),
    MapEntry::new("farranac_coast", "Farranac Coast", "MapFarranacCoastHex.png"),
    MapEntry::new("fishermans_row", "Fisherman's Row", "MapFishermansRowHex.png"),
    MapEntry::new("godcrofts", "Godcrofts", "MapGodcroftsHex.png"),
    MapEntry::new("great_march", "Great March", "MapGreatMarchHex.png"),
    MapEntry::new("heartlands", "Heartlands", "MapHeartlandsHex.png"),
    MapEntry::new("howl_county", "Howl County", "MapHowlCountyHex.png"),
    MapEntry::new("kalokai", "Kalokai", "MapKalokaiHex.png"),
    MapEntry::new("kings_cage", "King's Cage", "MapKingsCageHex.png"),
    MapEntry::new("linn_of_mercy", "Linn of Mercy", "MapLinnMercyHex.png"),
    MapEntry::new("loch_mor", "Loch Mor", "MapLochMorHex.png"),
    MapEntry::new("marban_hollow", "Marban Hollow", "MapMarbanHollow.png"),
    MapEntry::new("mooring_county", "Mooring County", "MapMooringCountyHex.png"),
    MapEntry::new("morgens_crossing", "Morgen's Crossing", "MapMorgensCrossingHex.png"),
    MapEntry::new("nevish_line", "Nevish Line", "MapNevishLineHex.png"),
    MapEntry::new("oarbreaker", "Oarbreaker", "MapOarbreakerHex.png"),
    MapEntry::new("origin", "Origin", "MapOriginHex.png"),
    MapEntry::new("reaching_trail", "Reaching Trail", "MapReachingTrailHex.png"),
    MapEntry::new("reavers_pass", "Reaver's Pass", "MapReaversPassHex.png"),
    MapEntry::new("red_river", "Red River", "MapRedRiverHex.png"),
    MapEntry::new("sableport", "Sableport", "MapSableportHex.png"),
    MapEntry::new("shackled_chasm", "Shackled Chasm", "MapShackledChasmHex.png"),
    MapEntry::new("speaking_woods", "Speaking Woods", "MapSpeakingWoodsHex.png"),
    MapEntry::new("stema_landing", "Stema Landing", "MapStemaLandingHex.png"),
    MapEntry::new("stonecradle", "Stonecradle", "MapStonecradleHex.png"),
    MapEntry::new("tempest_island", "Tempest Island", "MapTempestIslandHex.png"),
    MapEntry::new("terminus", "Terminus", "MapTerminusHex.png"),
    MapEntry::new("the_fingers", "The Fingers", "MapTheFingersHex.png"),
    MapEntry::new("umbral_wildwood", "Umbral Wildwood", "MapUmbralWildwoodHex.png"),
    MapEntry::new("viper_pit", "Viper Pit", "MapViperPitHex.png"),
    MapEntry::new("weathered_expanse", "Weathered Expanse", "MapWeatheredExpanseHex.png"),
    MapEntry::new("westgate", "Westgate", "MapWestgateHex.png"),
];

static BUILTIN: Lazy<MapCatalog> = Lazy::new(|| MapCatalog::new(BUILTIN_MAPS.to_vec()));

/// Read-only lookup table of map entries, in display order.
#[derive(Debug, Clone)]
pub struct MapCatalog {
    entries: Vec<MapEntry>,
    index: HashMap<&'static str, usize>,
}

impl MapCatalog {
    /// Builds a catalog from entries. Later duplicates of an id are ignored.
    pub fn new(entries: Vec<MapEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.contains_key(entry.id) {
                tracing::warn!(id = entry.id, "Duplicate map id in catalog, ignoring");
                continue;
            }
            index.insert(entry.id, i);
        }
        Self { entries, index }
    }

    /// The sectors shipped with the overlay.
    pub fn builtin() -> &'static MapCatalog {
        &BUILTIN
    }

    /// Case-sensitive exact id lookup.
    pub fn get(&self, id: &str) -> Option<&MapEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn file_name(&self, id: &str) -> Option<&'static str> {
        self.get(id).map(|entry| entry.file_name)
    }

    /// Position of an id in display order (for the sector picker).
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
