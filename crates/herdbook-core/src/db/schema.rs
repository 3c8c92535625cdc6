//! SQLite schema definition.

/// Complete database schema for herdbook.
///
/// References between collections are plain TEXT ids without foreign keys:
/// soft-deleted records keep pointing at each other, and purges may leave
/// dangling references that readers must tolerate.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Bulls
-- ============================================================================

CREATE TABLE IF NOT EXISTS bulls (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'alive'
        CHECK (status IN ('alive', 'dead', 'sold', 'deleted')),
    death_date TEXT,
    sale_date TEXT,
    sale_destination TEXT
);

CREATE INDEX IF NOT EXISTS idx_bulls_status ON bulls(status);

-- ============================================================================
-- Locations
-- ============================================================================

CREATE TABLE IF NOT EXISTS locations (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    assigned_bull_id TEXT NOT NULL,
    is_deleted INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_locations_bull ON locations(assigned_bull_id);
CREATE INDEX IF NOT EXISTS idx_locations_deleted ON locations(is_deleted);

-- ============================================================================
-- Cows
-- ============================================================================

CREATE TABLE IF NOT EXISTS cows (
    id TEXT PRIMARY KEY,
    dib TEXT NOT NULL CHECK (length(dib) = 4),
    birth_date TEXT NOT NULL,
    location_id TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'alive'
        CHECK (status IN ('alive', 'dead', 'sold', 'deleted')),
    death_date TEXT,
    sale_date TEXT,
    sale_destination TEXT
);

CREATE INDEX IF NOT EXISTS idx_cows_dib ON cows(dib);
CREATE INDEX IF NOT EXISTS idx_cows_location ON cows(location_id);
CREATE INDEX IF NOT EXISTS idx_cows_status ON cows(status);

-- ============================================================================
-- Calves
-- ============================================================================

CREATE TABLE IF NOT EXISTS calves (
    id TEXT PRIMARY KEY,
    dib TEXT NOT NULL CHECK (length(dib) = 4),
    sex TEXT NOT NULL CHECK (sex IN ('male', 'female')),
    mother_id TEXT NOT NULL,
    father_id TEXT NOT NULL,
    birth_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'alive'
        CHECK (status IN ('alive', 'dead', 'sold', 'breeding', 'deleted')),
    death_date TEXT,
    sale_date TEXT,
    sale_destination TEXT,
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_calves_dib ON calves(dib);
CREATE INDEX IF NOT EXISTS idx_calves_mother ON calves(mother_id);
CREATE INDEX IF NOT EXISTS idx_calves_father ON calves(father_id);
CREATE INDEX IF NOT EXISTS idx_calves_status ON calves(status);
CREATE INDEX IF NOT EXISTS idx_calves_birth_date ON calves(birth_date);

-- ============================================================================
-- Treatments
-- ============================================================================

CREATE TABLE IF NOT EXISTS treatments (
    id TEXT PRIMARY KEY,
    animal_id TEXT NOT NULL,
    animal_kind TEXT NOT NULL CHECK (animal_kind IN ('cow', 'calf', 'bull')),
    treatment_type TEXT NOT NULL,
    dosage TEXT NOT NULL,
    date_applied TEXT NOT NULL,
    repeat_required INTEGER NOT NULL DEFAULT 0,
    repeat_date TEXT,
    is_deleted INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_treatments_animal ON treatments(animal_kind, animal_id);
CREATE INDEX IF NOT EXISTS idx_treatments_date_applied ON treatments(date_applied);
CREATE INDEX IF NOT EXISTS idx_treatments_repeat_date ON treatments(repeat_date);
"#;
