use std::path::Path;

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use wayfind_core::policy::NetworkSegments;
use wayfind_core::{Coordinate, Network, PathSegment, Place, PlaceKind, VehicleType};

/// Read-only handle on the campus database. Opened per request; the
/// authoring tool owns the write side.
pub struct CampusDb {
    conn: Connection,
}

impl CampusDb {
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
        .context("failed to open campus database read-only")?;
        Self::apply_pragmas(&conn);
        Ok(Self { conn })
    }

    fn apply_pragmas(conn: &Connection) {
        // Best-effort; ignore unsupported errors
        let _ = conn.pragma_update(None, "query_only", &1i32);
        let _ = conn.pragma_update(None, "synchronous", &"OFF");
    }

    /// SQLite's change token: bumped whenever another connection commits.
    /// Used as the graph-cache invalidation signal.
    pub fn data_version(&self) -> Result<i64> {
        self.conn
            .query_row("PRAGMA data_version", [], |r| r.get(0))
            .context("read data_version")
    }

    pub fn load_segments(&self, network: Network) -> Result<Vec<PathSegment>> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT segment_id, geometry FROM path_segments
                 WHERE network = ?1 ORDER BY segment_id",
            )
            .context("prepare load_segments")?;
        let rows = stmt
            .query_map(params![network.as_str()], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })
            .context("exec load_segments")?;

        let mut out = Vec::new();
        for row in rows {
            let (id, geometry) = row?;
            let pairs: Vec<[f64; 2]> = serde_json::from_str(&geometry)
                .with_context(|| format!("segment {id}: malformed geometry"))?;
            out.push(PathSegment {
                id,
                network,
                nodes: pairs.iter().map(|p| Coordinate::new(p[0], p[1])).collect(),
            });
        }
        Ok(out)
    }

    pub fn load_networks(&self) -> Result<NetworkSegments> {
        Ok(NetworkSegments {
            walking: self.load_segments(Network::Walking)?,
            driving: self.load_segments(Network::Driving)?,
            accessible: self.load_segments(Network::Accessible)?,
        })
    }

    pub fn list_places(&self) -> Result<Vec<Place>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!(
                "SELECT {PLACE_COLUMNS} FROM places ORDER BY place_id"
            ))
            .context("prepare list_places")?;
        let rows = stmt
            .query_map([], PlaceRow::from_row)
            .context("exec list_places")?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_place()?);
        }
        Ok(out)
    }

    pub fn get_place(&self, id: &str) -> Result<Option<Place>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!(
                "SELECT {PLACE_COLUMNS} FROM places WHERE place_id = ?1"
            ))
            .context("prepare get_place")?;
        let row = stmt
            .query_row(params![id], PlaceRow::from_row)
            .optional()
            .context("exec get_place")?;
        row.map(PlaceRow::into_place).transpose()
    }
}

const PLACE_COLUMNS: &str = "place_id, name, lat, lng, node_lat, node_lng, kind, vehicle";

struct PlaceRow {
    id: String,
    name: String,
    lat: f64,
    lng: f64,
    node_lat: Option<f64>,
    node_lng: Option<f64>,
    kind: String,
    vehicle: Option<String>,
}

impl PlaceRow {
    fn from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            name: r.get(1)?,
            lat: r.get(2)?,
            lng: r.get(3)?,
            node_lat: r.get(4)?,
            node_lng: r.get(5)?,
            kind: r.get(6)?,
            vehicle: r.get(7)?,
        })
    }

    fn into_place(self) -> Result<Place> {
        let kind = match self.kind.as_str() {
            "building" => PlaceKind::Building,
            "gate" => PlaceKind::Gate,
            "kiosk" => PlaceKind::Kiosk,
            "parking" => {
                let vehicle = match self.vehicle.as_deref() {
                    Some("car") => VehicleType::Car,
                    Some("motorcycle") => VehicleType::Motorcycle,
                    other => bail!(
                        "place {}: parking with unknown vehicle {:?}",
                        self.id,
                        other
                    ),
                };
                PlaceKind::Parking { vehicle }
            }
            other => bail!("place {}: unknown kind {other:?}", self.id),
        };
        Ok(Place {
            id: self.id,
            name: self.name,
            lat: self.lat,
            lng: self.lng,
            node_lat: self.node_lat,
            node_lng: self.node_lng,
            kind,
        })
    }
}
