//! Field projection tables: which raw journal fields land in which columns,
//! and which are folded into each entity's detail bag.

use super::types::{FieldMap, Projection};
use crate::schema::tables;

pub static SYSTEM: Projection = Projection {
    table: &tables::SYSTEMS,
    fields: &[
        FieldMap::map("SystemAddress", "id"),
        FieldMap::map("StarSystem", "name"),
        FieldMap::position("StarPos", &["posx", "posy", "posz"]),
        FieldMap::map("StarClass", "startype"),
        FieldMap::map("SystemAllegiance", "allegiance"),
        FieldMap::map("SystemEconomy_Localised", "economy"),
        FieldMap::map("SystemSecondEconomy_Localised", "economysecond"),
        FieldMap::map("SystemGovernment_Localised", "government"),
        FieldMap::map("SystemSecurity_Localised", "security"),
        FieldMap::map("Population", "population"),
        FieldMap::reference("SystemFaction", "systemfaction_id", "faction_tbl", "name"),
        FieldMap::map("timestamp", "updated_at"),
    ],
    detail_fields: &[
        "ControllingPower",
        "Powers",
        "PowerplayState",
        "PowerplayStateControlProgress",
        "PowerplayStateReinforcement",
        "PowerplayStateUndermining",
        "Factions",
    ],
};

pub static BODY: Projection = Projection {
    table: &tables::BODIES,
    fields: &[
        FieldMap::map("SystemAddress", "system_id"),
        FieldMap::map("BodyID", "body_id"),
        FieldMap::map("BodyName", "name"),
        FieldMap::map("Body", "name"),
        FieldMap::map("BodyType", "type"),
        FieldMap::map("WasDiscovered", "wasdiscovered"),
        FieldMap::map("WasMapped", "wasmapped"),
        FieldMap::map("timestamp", "updated_at"),
    ],
    detail_fields: &[
        "Parents",
        "DistanceFromArrivalLS",
        "TidalLock",
        "TerraformState",
        "PlanetClass",
        "Atmosphere",
        "AtmosphereType",
        "Volcanism",
        "MassEM",
        "Radius",
        "SurfaceGravity",
        "SurfaceTemperature",
        "SurfacePressure",
        "Landable",
        "Materials",
        "Composition",
        "SemiMajorAxis",
        "Eccentricity",
        "OrbitalInclination",
        "Periapsis",
        "OrbitalPeriod",
        "AscendingNode",
        "MeanAnomaly",
        "RotationPeriod",
        "AxialTilt",
    ],
};

pub static MARKET: Projection = Projection {
    table: &tables::MARKETS,
    fields: &[
        FieldMap::map("MarketID", "id"),
        FieldMap::map("StationName", "name"),
        FieldMap::map("Name", "name"),
        FieldMap::map("SystemAddress", "system_id"),
        FieldMap::map("BodyID", "body_id"),
        FieldMap::map("StationType", "type"),
        FieldMap::map("StationGovernment_Localised", "government"),
        FieldMap::map("StationEconomy_Localised", "economy"),
        FieldMap::reference("StationFaction", "stationfaction_id", "faction_tbl", "name"),
        FieldMap::map("DistFromStarLS", "distfromstarls"),
        FieldMap::flatten(
            "LandingPads",
            &[("Small", "pads"), ("Medium", "padm"), ("Large", "padl")],
        ),
        FieldMap::map("timestamp", "updated_at"),
    ],
    detail_fields: &["StationServices"],
};

/// Projected per item of a Factions array, after localised merge, with the
/// envelope timestamp injected.
pub static FACTION: Projection = Projection {
    table: &tables::FACTIONS,
    fields: &[
        FieldMap::map("Name", "name"),
        FieldMap::map("Allegiance", "allegiance"),
        FieldMap::map("Government", "government"),
        FieldMap::map("MyReputation", "myreputation"),
        FieldMap::map("timestamp", "updated_at"),
    ],
    detail_fields: &[],
};

/// Projected per item of a Factions array; the faction reference is part of
/// the key, and the active/pending states are combined into the state bag.
pub static SYSTEM_FACTION: Projection = Projection {
    table: &tables::SYSTEM_FACTIONS,
    fields: &[
        FieldMap::map("SystemAddress", "system_id"),
        FieldMap::reference("Name", "faction_id", "faction_tbl", "name"),
        FieldMap::map("Influence", "influence"),
        FieldMap::map("Happiness", "happiness"),
        FieldMap::map("timestamp", "updated_at"),
    ],
    detail_fields: &["ActiveStates", "PendingStates"],
};

pub static STATISTICS: Projection = Projection {
    table: &tables::STATISTICS,
    fields: &[FieldMap::map("timestamp", "updated_at")],
    detail_fields: &[
        "Bank_Account",
        "Combat",
        "Crime",
        "Smuggling",
        "Trading",
        "Mining",
        "Exploration",
        "Passengers",
        "Search_And_Rescue",
        "Squadron",
        "Crafting",
        "Crew",
        "Multicrew",
        "Material_Trader_Stats",
        "Exobiology",
    ],
};

/// Projected per line item of a market snapshot.
pub static COMMODITY: Projection = Projection {
    table: &tables::COMMODITIES,
    fields: &[
        FieldMap::map("Name", "name"),
        FieldMap::map("Name_Localised", "name"),
        FieldMap::map("Category", "category"),
        FieldMap::map("Category_Localised", "category"),
        FieldMap::map("Rare", "israre"),
    ],
    detail_fields: &[],
};

/// Projected per line item of a market snapshot; the market and commodity
/// keys and the snapshot timestamp come from the envelope.
pub static MARKET_PRICE: Projection = Projection {
    table: &tables::MARKET_PRICES,
    fields: &[
        FieldMap::map("BuyPrice", "buyprice"),
        FieldMap::map("SellPrice", "sellprice"),
        FieldMap::map("StockBracket", "stockbracket"),
        FieldMap::map("DemandBracket", "demandbracket"),
        FieldMap::map("Stock", "stock"),
        FieldMap::map("Demand", "demand"),
    ],
    detail_fields: &[],
};
