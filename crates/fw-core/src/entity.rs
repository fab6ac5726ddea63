use std::fmt;

use uuid::Uuid;

use crate::coord::Coord;
use crate::slots::EntitySlot;
use crate::zone::ZoneKey;

/// World-presence state shared by every entity that occupies tiles.
///
/// The registry keeps these fields consistent: `slot` is valid exactly while
/// the entity is registered, and `last_zone` always names the zone bucket the
/// entity is currently indexed under (or [`ZoneKey::NULL`] when it is not
/// indexed, e.g. while hidden).
#[derive(Debug, Clone)]
pub struct Presence {
    /// Slot in the owning table, [`EntitySlot::INVALID`] when unregistered.
    pub slot: EntitySlot,
    /// Absolute tile position.
    pub coords: Coord,
    /// The zone key this entity is currently indexed under.
    pub last_zone: ZoneKey,
    /// Whether the entity is hidden from the world (still registered).
    pub hidden: bool,
    /// Global tick cycle last synced into this entity.
    pub clock: u64,
}

impl Presence {
    /// Presence for a not-yet-registered entity standing at `coords`.
    pub fn at(coords: Coord) -> Self {
        Self {
            slot: EntitySlot::INVALID,
            coords,
            last_zone: ZoneKey::NULL,
            hidden: false,
            clock: 0,
        }
    }
}

/// Local end of the externally-transmitted visual channel.
///
/// Wire encoding lives outside this core; the registry only toggles the
/// channel at documented lifecycle points.
#[derive(Debug, Clone, Default)]
pub struct AvatarState {
    enabled: bool,
    hidden: bool,
}

impl AvatarState {
    /// A fresh, transmitting, visible channel.
    pub fn active() -> Self {
        Self {
            enabled: true,
            hidden: false,
        }
    }

    /// Stop transmitting entirely. Terminal for this entity's channel.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Keep the channel but mark the avatar invisible.
    pub fn hide(&mut self) {
        self.hidden = true;
    }

    /// Make the avatar visible again.
    pub fn reveal(&mut self) {
        self.hidden = false;
    }

    /// Whether the channel is transmitting.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the avatar is currently marked invisible.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

/// An entity the registry and tick processor can manage.
///
/// Implemented by [`Npc`] and [`Player`]; both share the [`Presence`] shape
/// and differ in surrounding content data and in what disabling their avatar
/// channel means (despawn vs. disconnect).
pub trait WorldEntity {
    /// Shared world-presence state.
    fn presence(&self) -> &Presence;

    /// Mutable access to the shared world-presence state.
    fn presence_mut(&mut self) -> &mut Presence;

    /// Identity string for diagnostics and eviction logs.
    fn label(&self) -> String;

    /// Stop transmitting this entity's avatar. Called on retirement.
    fn disable_avatar(&mut self);

    /// Mark the avatar invisible while the entity stays registered.
    fn hide_avatar(&mut self);

    /// Make the avatar visible again.
    fn reveal_avatar(&mut self);
}

/// A non-player character.
#[derive(Debug, Clone)]
pub struct Npc {
    /// Shared world-presence state.
    pub presence: Presence,
    /// Content-defined NPC type.
    pub type_id: u16,
    /// Content group used for keyed event routing.
    pub content_group: i32,
    /// Display name.
    pub name: String,
    /// Spawn-point tile this NPC is anchored to.
    pub home: Coord,
    /// Visual-transmission channel state.
    pub avatar: AvatarState,
}

impl Npc {
    /// Create an NPC of `type_id` standing at `coords`, anchored there.
    pub fn new(type_id: u16, name: impl Into<String>, coords: Coord) -> Self {
        Self {
            presence: Presence::at(coords),
            type_id,
            content_group: 0,
            name: name.into(),
            home: coords,
            avatar: AvatarState::active(),
        }
    }

    /// Set the content group used for keyed event routing.
    pub fn with_content_group(mut self, group: i32) -> Self {
        self.content_group = group;
        self
    }
}

impl WorldEntity for Npc {
    fn presence(&self) -> &Presence {
        &self.presence
    }

    fn presence_mut(&mut self) -> &mut Presence {
        &mut self.presence
    }

    fn label(&self) -> String {
        format!(
            "npc({}, type={}, {}, {})",
            self.name, self.type_id, self.presence.slot, self.presence.coords
        )
    }

    fn disable_avatar(&mut self) {
        self.avatar.disable();
    }

    fn hide_avatar(&mut self) {
        self.avatar.hide();
    }

    fn reveal_avatar(&mut self) {
        self.avatar.reveal();
    }
}

impl fmt::Display for Npc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A connected player character.
#[derive(Debug, Clone)]
pub struct Player {
    /// Shared world-presence state.
    pub presence: Presence,
    /// Stable account identity across sessions.
    pub account: Uuid,
    /// Name shown to other players.
    pub display_name: String,
    /// Visual-transmission channel state.
    pub avatar: AvatarState,
    connected: bool,
}

impl Player {
    /// Create a freshly-connected player standing at `coords`.
    pub fn new(display_name: impl Into<String>, coords: Coord) -> Self {
        Self::with_account(Uuid::new_v4(), display_name, coords)
    }

    /// Create a player with a known account identity.
    pub fn with_account(account: Uuid, display_name: impl Into<String>, coords: Coord) -> Self {
        Self {
            presence: Presence::at(coords),
            account,
            display_name: display_name.into(),
            avatar: AvatarState::active(),
            connected: true,
        }
    }

    /// Whether the player's client session is still open.
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl WorldEntity for Player {
    fn presence(&self) -> &Presence {
        &self.presence
    }

    fn presence_mut(&mut self) -> &mut Presence {
        &mut self.presence
    }

    fn label(&self) -> String {
        format!(
            "player({}, {}, {})",
            self.display_name, self.presence.slot, self.presence.coords
        )
    }

    /// Disabling a player's channel closes the client session: retirement
    /// means disconnect for players.
    fn disable_avatar(&mut self) {
        self.avatar.disable();
        self.connected = false;
    }

    fn hide_avatar(&mut self) {
        self.avatar.hide();
    }

    fn reveal_avatar(&mut self) {
        self.avatar.reveal();
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
