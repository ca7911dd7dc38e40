use engine::{
    approach, approach_scalar, DrawHandle, DrawToken, MapPlacement, SpriteKey, Vec2,
    APPROACH_FACTOR, OPAQUE_ALPHA,
};

use super::location::{Location, LocationTable};
use crate::config::SpriteSet;

const DEFAULT_TOKEN_SIZE: f32 = 80.0;
const WORKER_TOKEN_SIZE: f32 = 60.0;
const EMPLOYEE_SPREAD_PERIOD: u64 = 12;
const EMPLOYEE_SPREAD_CENTER: i64 = 6;
pub const EMPLOYEE_SPREAD_STEP: f32 = 5.0;
pub const CLIMATE_MIN_SIZE: f32 = 30.0;
pub const CLIMATE_MAX_SIZE: f32 = 150.0;
pub const CLIMATE_GROWTH_PER_FRAME: f32 = 5.0;
pub const SOUP_MAX_RADIUS: f32 = 100.0;
pub const SOUP_RETIRE_RATIO: f32 = 0.9;
const SOUP_SIZE_PER_VEGETABLE: f32 = 20.0;
const SOUP_ALPHA_GAIN: f32 = 1024.0;
// Visual clamp only; the simulation harvests at a lower threshold.
pub const VEGETABLE_WATER_CLAMP: i64 = 20;
const VEGETABLE_SIZE_PER_WATER: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClimateKind {
    Flood,
    Fire,
    Frost,
    HeatWave,
}

impl ClimateKind {
    fn sprite(self, sprites: &SpriteSet) -> &SpriteKey {
        match self {
            Self::Flood => &sprites.flood,
            Self::Fire => &sprites.fire,
            Self::Frost => &sprites.frost,
            Self::HeatWave => &sprites.heat_wave,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crop {
    Potato,
    Leek,
    Tomato,
    Onion,
    Zucchini,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldContent {
    Empty,
    Crop(Crop),
    Unknown(String),
}

impl FieldContent {
    pub fn parse(name: &str) -> Self {
        match name {
            "NONE" => Self::Empty,
            "POTATO" => Self::Crop(Crop::Potato),
            "LEEK" => Self::Crop(Crop::Leek),
            "TOMATO" => Self::Crop(Crop::Tomato),
            "ONION" => Self::Crop(Crop::Onion),
            "ZUCCHINI" => Self::Crop(Crop::Zucchini),
            other => Self::Unknown(other.to_string()),
        }
    }

    fn sprite(&self, sprites: &SpriteSet) -> SpriteKey {
        match self {
            Self::Crop(Crop::Potato) => sprites.potato.clone(),
            Self::Crop(Crop::Leek) => sprites.leek.clone(),
            Self::Crop(Crop::Tomato) => sprites.tomato.clone(),
            Self::Crop(Crop::Onion) => sprites.onion.clone(),
            Self::Crop(Crop::Zucchini) => sprites.zucchini.clone(),
            Self::Empty | Self::Unknown(_) => sprites.fallback.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Employee { id: u64 },
    Tractor { id: u64 },
    Vegetable { content: FieldContent, needed_water: i64 },
    Climate { kind: ClimateKind, size: f32 },
    Soup { angle_degrees: f32, radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderAttrs {
    pub width: f32,
    pub height: f32,
    pub angle_degrees: f32,
    pub alpha: u8,
}

impl RenderAttrs {
    fn square(size: f32) -> Self {
        Self {
            width: size,
            height: size,
            angle_degrees: 0.0,
            alpha: OPAQUE_ALPHA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Retired,
}

/// A token on the farm: current local position, the location it heads for,
/// and how it looks. Per-kind behavior is selected by [`EntityKind`].
#[derive(Debug, Clone)]
pub struct VisualEntity {
    kind: EntityKind,
    sprite: SpriteKey,
    position: Vec2,
    target: Location,
    render: RenderAttrs,
    handle: Option<DrawHandle>,
}

impl VisualEntity {
    pub fn employee(id: u64, sprites: &SpriteSet, table: &LocationTable) -> Self {
        Self::worker(EntityKind::Employee { id }, sprites.employee.clone(), table)
    }

    pub fn tractor(id: u64, sprites: &SpriteSet, table: &LocationTable) -> Self {
        Self::worker(EntityKind::Tractor { id }, sprites.tractor.clone(), table)
    }

    // Workers start at the farm building and walk to their first target.
    fn worker(kind: EntityKind, sprite: SpriteKey, table: &LocationTable) -> Self {
        Self {
            kind,
            sprite,
            position: table.position(Location::Farm),
            target: Location::Farm,
            render: RenderAttrs::square(WORKER_TOKEN_SIZE),
            handle: None,
        }
    }

    pub fn vegetable(
        location: Location,
        content: FieldContent,
        needed_water: i64,
        sprites: &SpriteSet,
        table: &LocationTable,
    ) -> Self {
        Self {
            sprite: content.sprite(sprites),
            kind: EntityKind::Vegetable {
                content,
                needed_water,
            },
            position: centerline(table.position(location)),
            target: location,
            render: RenderAttrs::square(vegetable_size(needed_water)),
            handle: None,
        }
    }

    pub fn climate(
        kind: ClimateKind,
        target: Location,
        sprites: &SpriteSet,
        table: &LocationTable,
    ) -> Self {
        Self {
            sprite: kind.sprite(sprites).clone(),
            kind: EntityKind::Climate {
                kind,
                size: CLIMATE_MIN_SIZE,
            },
            position: centerline(table.position(target)),
            target,
            render: RenderAttrs::square(CLIMATE_MIN_SIZE),
            handle: None,
        }
    }

    pub fn soup(
        angle_degrees: f32,
        vegetables: u32,
        sprites: &SpriteSet,
        table: &LocationTable,
    ) -> Self {
        Self {
            kind: EntityKind::Soup {
                angle_degrees,
                radius: 0.0,
            },
            sprite: sprites.soup.clone(),
            position: soup_position(table.position(Location::SoupFactory), angle_degrees, 0.0),
            target: Location::SoupFactory,
            render: RenderAttrs::square(SOUP_SIZE_PER_VEGETABLE * vegetables as f32),
            handle: None,
        }
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn sprite(&self) -> &SpriteKey {
        &self.sprite
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target(&self) -> Location {
        self.target
    }

    pub fn render(&self) -> RenderAttrs {
        self.render
    }

    pub fn handle(&self) -> Option<DrawHandle> {
        self.handle
    }

    /// Empty fields are tracked but never drawn.
    pub fn is_drawable(&self) -> bool {
        !matches!(
            self.kind,
            EntityKind::Vegetable {
                content: FieldContent::Empty,
                ..
            }
        )
    }

    pub(crate) fn set_target(&mut self, target: Location) {
        self.target = target;
    }

    pub(crate) fn attach(&mut self, handle: DrawHandle) {
        self.handle = Some(handle);
    }

    /// Where the entity is heading, in local coordinates.
    pub fn target_position(&self, table: &LocationTable) -> Vec2 {
        let anchor = table.position(self.target);
        match &self.kind {
            EntityKind::Employee { id } => Vec2 {
                x: anchor.x + employee_spread(*id),
                y: anchor.y,
            },
            EntityKind::Tractor { .. } => anchor,
            EntityKind::Vegetable { .. } | EntityKind::Climate { .. } => centerline(anchor),
            EntityKind::Soup { angle_degrees, .. } => {
                soup_position(anchor, *angle_degrees, SOUP_MAX_RADIUS)
            }
        }
    }

    /// Advances one frame and reports whether the entity should be retired.
    pub fn step(&mut self, table: &LocationTable) -> Lifecycle {
        let target = self.target_position(table);
        match &mut self.kind {
            EntityKind::Employee { .. } | EntityKind::Tractor { .. } => {
                self.position = approach(self.position, target, APPROACH_FACTOR);
                Lifecycle::Alive
            }
            EntityKind::Vegetable { .. } => Lifecycle::Alive,
            EntityKind::Climate { size, .. } => {
                self.position = target;
                *size += CLIMATE_GROWTH_PER_FRAME;
                self.render.width = *size;
                self.render.height = *size;
                self.render.alpha = climate_alpha(*size);
                if *size > CLIMATE_MAX_SIZE {
                    Lifecycle::Retired
                } else {
                    Lifecycle::Alive
                }
            }
            EntityKind::Soup {
                angle_degrees,
                radius,
            } => {
                *radius = approach_scalar(*radius, SOUP_MAX_RADIUS, APPROACH_FACTOR);
                let factory = table.position(Location::SoupFactory);
                self.position = soup_position(factory, *angle_degrees, *radius);
                self.render.alpha = soup_alpha(*radius);
                if *radius / SOUP_MAX_RADIUS > SOUP_RETIRE_RATIO {
                    Lifecycle::Retired
                } else {
                    Lifecycle::Alive
                }
            }
        }
    }

    pub fn to_token(&self, placement: &MapPlacement) -> DrawToken {
        DrawToken {
            sprite: self.sprite.clone(),
            center: placement.to_map(self.position),
            width: self.render.width,
            height: self.render.height,
            angle_degrees: self.render.angle_degrees,
            alpha: self.render.alpha,
        }
    }

    /// Copies position and render attributes into an already registered token.
    pub fn refresh_token(&self, token: &mut DrawToken, placement: &MapPlacement) {
        token.center = placement.to_map(self.position);
        token.width = self.render.width;
        token.height = self.render.height;
        token.angle_degrees = self.render.angle_degrees;
        token.alpha = self.render.alpha;
    }
}

/// Horizontal offset fanning out employees that share a location.
pub fn employee_spread(id: u64) -> f32 {
    let slot = (id % EMPLOYEE_SPREAD_PERIOD) as i64 - EMPLOYEE_SPREAD_CENTER;
    slot as f32 * EMPLOYEE_SPREAD_STEP
}

/// Token edge length for a crop still needing `needed_water` units.
pub fn vegetable_size(needed_water: i64) -> f32 {
    let remaining = needed_water.clamp(0, VEGETABLE_WATER_CLAMP);
    VEGETABLE_SIZE_PER_WATER * (VEGETABLE_WATER_CLAMP - remaining) as f32
}

pub fn climate_alpha(size: f32) -> u8 {
    let ratio = (CLIMATE_MAX_SIZE - size) / (CLIMATE_MAX_SIZE - CLIMATE_MIN_SIZE);
    (ratio * f32::from(OPAQUE_ALPHA)).clamp(0.0, f32::from(OPAQUE_ALPHA)) as u8
}

fn soup_alpha(radius: f32) -> u8 {
    let ratio = (SOUP_MAX_RADIUS - radius) / SOUP_MAX_RADIUS;
    (ratio * SOUP_ALPHA_GAIN).clamp(0.0, f32::from(OPAQUE_ALPHA)) as u8
}

fn soup_position(factory: Vec2, angle_degrees: f32, radius: f32) -> Vec2 {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    Vec2 {
        x: factory.x + radius * cos,
        y: radius * sin,
    }
}

fn centerline(anchor: Vec2) -> Vec2 {
    Vec2 {
        x: anchor.x,
        y: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LocationTable {
        LocationTable::default()
    }

    #[test]
    fn employee_spread_is_periodic_in_twelve() {
        assert_ne!(employee_spread(0), employee_spread(6));
        assert_eq!(employee_spread(0), employee_spread(12));
        assert_eq!(employee_spread(0), -30.0);
        assert_eq!(employee_spread(6), 0.0);
        assert_eq!(employee_spread(11), 25.0);
    }

    #[test]
    fn vegetable_size_shrinks_toward_harvest_and_clamps() {
        assert_eq!(vegetable_size(0), 80.0);
        assert_eq!(vegetable_size(10), 40.0);
        assert_eq!(vegetable_size(20), 0.0);
        assert_eq!(vegetable_size(25), 0.0);
        assert_eq!(vegetable_size(-5), 80.0);
    }

    #[test]
    fn climate_alpha_fades_linearly_with_size() {
        assert_eq!(climate_alpha(CLIMATE_MIN_SIZE), 255);
        assert_eq!(climate_alpha(90.0), 127);
        assert_eq!(climate_alpha(CLIMATE_MAX_SIZE), 0);
        assert_eq!(climate_alpha(CLIMATE_MAX_SIZE + 5.0), 0);
    }

    #[test]
    fn employee_heads_for_offset_target_and_tractor_does_not() {
        let table = table();
        let sprites = SpriteSet::default();
        let mut employee = VisualEntity::employee(0, &sprites, &table);
        let mut tractor = VisualEntity::tractor(0, &sprites, &table);
        employee.set_target(Location::Field2);
        tractor.set_target(Location::Field2);

        let field = table.position(Location::Field2);
        assert_eq!(employee.target_position(&table).x, field.x - 30.0);
        assert_eq!(tractor.target_position(&table), field);
    }

    #[test]
    fn worker_step_applies_approach_rule() {
        let table = table();
        let mut tractor = VisualEntity::tractor(3, &SpriteSet::default(), &table);
        let start = tractor.position();
        tractor.set_target(Location::SoupFactory);
        let goal = table.position(Location::SoupFactory);

        assert_eq!(tractor.step(&table), Lifecycle::Alive);
        let expected_x = (goal.x - start.x) * 0.2 + start.x;
        assert!((tractor.position().x - expected_x).abs() < 1e-3);
        assert!(tractor.position().distance(goal) < start.distance(goal));
    }

    #[test]
    fn climate_event_grows_fades_and_retires_past_max() {
        let table = table();
        let mut event = VisualEntity::climate(
            ClimateKind::Fire,
            Location::Field3,
            &SpriteSet::default(),
            &table,
        );
        assert_eq!(event.render().alpha, 255);
        assert_eq!(event.render().width, CLIMATE_MIN_SIZE);

        let mut frames = 0;
        let mut last_alpha = event.render().alpha;
        loop {
            frames += 1;
            let state = event.step(&table);
            assert_eq!(event.position().x, table.position(Location::Field3).x);
            assert_eq!(event.position().y, 0.0);
            assert!(event.render().alpha <= last_alpha);
            last_alpha = event.render().alpha;
            if state == Lifecycle::Retired {
                break;
            }
        }
        // 30 -> 155 in steps of 5.
        assert_eq!(frames, 25);
        assert_eq!(event.render().width, 155.0);
    }

    #[test]
    fn soup_spreads_from_factory_and_retires_near_max_radius() {
        let table = table();
        let factory = table.position(Location::SoupFactory);
        let mut soup = VisualEntity::soup(90.0, 3, &SpriteSet::default(), &table);
        assert_eq!(soup.render().width, 60.0);

        assert_eq!(soup.step(&table), Lifecycle::Alive);
        assert!((soup.position().x - factory.x).abs() < 1e-3);
        assert!((soup.position().y - 20.0).abs() < 1e-3);

        let mut frames = 1;
        while soup.step(&table) == Lifecycle::Alive {
            frames += 1;
            assert!(frames < 100, "soup never retired");
        }
        // Radius passes 90 on the eleventh frame: 100 * (1 - 0.8^11) ~ 91.4.
        assert_eq!(frames + 1, 11);
    }

    #[test]
    fn empty_fields_are_not_drawable_but_unknown_crops_are() {
        let table = table();
        let sprites = SpriteSet::default();
        let empty = VisualEntity::vegetable(
            Location::Field1,
            FieldContent::parse("NONE"),
            0,
            &sprites,
            &table,
        );
        let unknown = VisualEntity::vegetable(
            Location::Field1,
            FieldContent::parse("MANDRAKE"),
            0,
            &sprites,
            &table,
        );
        assert!(!empty.is_drawable());
        assert!(unknown.is_drawable());
        assert_eq!(unknown.sprite(), &sprites.fallback);
    }

    #[test]
    fn token_maps_local_position_through_placement() {
        let table = table();
        let vegetable = VisualEntity::vegetable(
            Location::Field1,
            FieldContent::parse("LEEK"),
            10,
            &SpriteSet::default(),
            &table,
        );
        let placement = MapPlacement::new(Vec2::new(1000.0, 500.0), 0.0);
        let token = vegetable.to_token(&placement);
        assert_eq!(
            token.center,
            Vec2::new(1000.0 + table.position(Location::Field1).x, 500.0)
        );
        assert_eq!(token.width, 40.0);
        assert_eq!(token.sprite.as_str(), "crops/leek");
    }
}
