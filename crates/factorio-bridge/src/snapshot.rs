//! In-memory world snapshots
//!
//! A snapshot freezes the entities around a connection so both resolvers see
//! the same world for the whole call, and repeated resolves stay identical.

use connect_core::{
    BeltGroup, ConnectError, Dimensions, Direction, Entity, EntityKind, EntityQuery, Position,
    Result, TransportBelt,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Lua chunk returning every entity within a radius as JSON
///
/// Placeholders: surface name, centre x, centre y, radius.
pub(crate) const SNAPSHOT_LUA: &str = r#"local s = game.surfaces["{surface}"]
local out = {}
for _, e in pairs(s.find_entities_filtered{position = {x = {x}, y = {y}}, radius = {radius}}) do
  local rec = {name = e.name, type = e.type, unit_number = e.unit_number, position = e.position,
    direction = e.direction, width = e.tile_width, height = e.tile_height}
  if e.fluidbox then
    local points = {}
    for i = 1, #e.fluidbox do
      local proto = e.fluidbox.get_prototype(i)
      local output = proto.production_type == "output"
      for _, c in pairs(e.fluidbox.get_pipe_connections(i)) do
        points[#points + 1] = {x = c.target_position.x, y = c.target_position.y, output = output}
      end
    end
    rec.fluid_connections = points
  end
  if e.type == "inserter" then
    rec.pickup_position = e.pickup_position
    rec.drop_position = e.drop_position
  elseif e.type == "mining-drill" then
    rec.drop_position = e.drop_position
  end
  out[#out + 1] = rec
end
rcon.print(helpers.table_to_json(out))"#;

/// Render [`SNAPSHOT_LUA`] for one query area
pub(crate) fn snapshot_lua(surface: &str, center: Position, radius: f64) -> String {
    SNAPSHOT_LUA
        .replace("{surface}", surface)
        .replace("{x}", &center.x.to_string())
        .replace("{y}", &center.y.to_string())
        .replace("{radius}", &radius.to_string())
}

/// One pipe socket reported by the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluidConnection {
    pub x: f64,
    pub y: f64,
    /// Belongs to an output-only fluidbox (e.g. boiler steam)
    #[serde(default)]
    pub output: bool,
}

/// Entity as reported by the snapshot Lua
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub unit_number: Option<u64>,
    pub position: Position,
    #[serde(default)]
    pub direction: u8,
    #[serde(default = "one_tile")]
    pub width: f64,
    #[serde(default = "one_tile")]
    pub height: f64,
    #[serde(default)]
    pub fluid_connections: Vec<FluidConnection>,
    #[serde(default)]
    pub pickup_position: Option<Position>,
    #[serde(default)]
    pub drop_position: Option<Position>,
}

fn one_tile() -> f64 {
    1.0
}

impl EntityRecord {
    /// Classify the record into the entity model by its prototype type
    pub fn into_entity(self) -> Entity {
        let direction = Direction::from_factorio(self.direction).unwrap_or_default();
        let sockets = |output: bool| -> Vec<Position> {
            self.fluid_connections
                .iter()
                .filter(|c| c.output == output)
                .map(|c| Position::new(c.x, c.y))
                .collect()
        };
        let all_sockets: Vec<Position> = self
            .fluid_connections
            .iter()
            .map(|c| Position::new(c.x, c.y))
            .collect();

        let kind = match self.entity_type.as_str() {
            "boiler" => EntityKind::Boiler {
                connection_points: sockets(false),
                steam_output_point: sockets(true)
                    .first()
                    .copied()
                    .unwrap_or(self.position),
            },
            "generator" => EntityKind::Generator {
                connection_points: all_sockets,
            },
            "offshore-pump" => EntityKind::OffshorePump {
                connection_points: all_sockets,
            },
            "mining-drill" => EntityKind::MiningDrill {
                drop_position: self.drop_position.unwrap_or(self.position),
            },
            "inserter" => EntityKind::Inserter {
                pickup_position: self.pickup_position.unwrap_or(self.position),
                drop_position: self.drop_position.unwrap_or(self.position),
            },
            "transport-belt" => {
                let belt = TransportBelt::new(self.position, direction);
                EntityKind::TransportBelt {
                    input_position: belt.input_position,
                    output_position: belt.output_position,
                }
            }
            _ if !all_sockets.is_empty() => EntityKind::FluidHandler {
                connection_points: all_sockets,
            },
            _ => EntityKind::Other,
        };

        Entity {
            name: self.name,
            unit_number: self.unit_number,
            position: self.position,
            direction,
            dimensions: Dimensions::new(self.width, self.height),
            kind,
        }
    }
}

/// Frozen set of placed entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    entities: Vec<Entity>,
}

impl WorldSnapshot {
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn from_records(records: Vec<EntityRecord>) -> Self {
        Self::from_entities(records.into_iter().map(EntityRecord::into_entity).collect())
    }

    /// Parse the JSON printed by the snapshot Lua
    ///
    /// `table_to_json` renders an empty table as `{}`, which counts as no entities.
    pub fn from_rcon_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json.trim())?;
        match value {
            serde_json::Value::Object(map) if map.is_empty() => Ok(Self::default()),
            value => Ok(Self::from_records(serde_json::from_value(value)?)),
        }
    }

    /// Parse a JSON array of entities in the model's own format
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_entities(serde_json::from_str(json)?))
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up an entity by unit number
    pub fn entity(&self, unit_number: u64) -> Result<&Entity> {
        self.entities
            .iter()
            .find(|e| e.unit_number == Some(unit_number))
            .ok_or(ConnectError::EntityNotFound(unit_number))
    }

    /// Trace the run of connected belts containing the given belt
    ///
    /// Belts join the run when one feeds the other, including side-loading.
    /// Segments are returned feeders first; belt loops keep snapshot order.
    pub fn belt_group(&self, unit_number: u64) -> Result<BeltGroup> {
        let start = self.entity(unit_number)?;
        let start = start.as_belt().ok_or_else(|| {
            ConnectError::InvalidEndpoint(format!(
                "entity {} ({}) is not a transport belt",
                unit_number, start.name
            ))
        })?;

        let belts: Vec<TransportBelt> = self.entities.iter().filter_map(Entity::as_belt).collect();
        let Some(first) = belts.iter().position(|b| *b == start) else {
            return Ok(BeltGroup::from_belts(vec![start]));
        };

        // Flood fill over feed links in either direction
        let mut member = vec![false; belts.len()];
        member[first] = true;
        let mut frontier = vec![first];
        while let Some(i) = frontier.pop() {
            for (j, other) in belts.iter().enumerate() {
                if !member[j] && (belts[i].feeds(other) || other.feeds(&belts[i])) {
                    member[j] = true;
                    frontier.push(j);
                }
            }
        }

        // Order feeders before the belts they feed
        let members: Vec<usize> = (0..belts.len()).filter(|&i| member[i]).collect();
        let mut placed = vec![false; belts.len()];
        let mut ordered = Vec::with_capacity(members.len());
        while ordered.len() < members.len() {
            let next = members
                .iter()
                .copied()
                .find(|&i| {
                    !placed[i]
                        && !members
                            .iter()
                            .any(|&j| !placed[j] && j != i && belts[j].feeds(&belts[i]))
                })
                .or_else(|| members.iter().copied().find(|&i| !placed[i]));
            let Some(next) = next else { break };
            placed[next] = true;
            ordered.push(belts[next]);
        }

        Ok(BeltGroup::from_belts(ordered))
    }

    /// SHA-256 of the snapshot's canonical JSON
    pub fn state_hash(&self) -> Result<String> {
        let json = serde_json::to_string(&self.entities)?;
        Ok(hex::encode(Sha256::digest(json.as_bytes())))
    }
}

impl EntityQuery for WorldSnapshot {
    fn get_entities(&self, position: Position, radius: f64) -> Vec<Entity> {
        self.entities.get_entities(position, radius)
    }
}
