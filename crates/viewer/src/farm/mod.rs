mod entity;
mod event_log;
mod location;

use std::collections::{HashMap, HashSet};

use engine::{DrawList, DrawSink, DrawToken, MapPlacement, SpriteKey, Vec2};
use tracing::{debug, warn};

use crate::config::{SpriteSet, ViewerConfig};
use crate::snapshot::{FarmSnapshot, FieldSnapshot, WorkerSnapshot};

pub use entity::{
    climate_alpha, employee_spread, vegetable_size, ClimateKind, Crop, EntityKind, FieldContent,
    Lifecycle, RenderAttrs, VisualEntity, CLIMATE_GROWTH_PER_FRAME, CLIMATE_MAX_SIZE,
    CLIMATE_MIN_SIZE, EMPLOYEE_SPREAD_STEP, SOUP_MAX_RADIUS, SOUP_RETIRE_RATIO,
    VEGETABLE_WATER_CLAMP,
};
pub use event_log::{decode_events, decode_line, EventRequest, CLIMATE_MARKER, SOUP_MARKER};
pub use location::{Location, LocationError, LocationTable, FIELD_COUNT};

pub const SOUP_ANGLE_STEP_DEGREES: f32 = 10.0;
const BLOCKED_OVERLAY_SIZE: f32 = 300.0;
const CLOSED_OVERLAY_SIZE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerRole {
    Employee,
    Tractor,
}

impl WorkerRole {
    fn as_token(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Tractor => "tractor",
        }
    }
}

/// Visual state of one farm, reconciled against simulation snapshots and
/// animated once per frame.
///
/// Snapshots and frames run on independent cadences: [`Farm::update`] only
/// retargets, creates and removes entities, while [`Farm::draw`] moves them
/// and retires finished transient effects.
#[derive(Debug)]
pub struct Farm {
    slot: usize,
    placement: MapPlacement,
    table: LocationTable,
    sprites: SpriteSet,
    employees: HashMap<u64, VisualEntity>,
    tractors: HashMap<u64, VisualEntity>,
    vegetables: Vec<VisualEntity>,
    climate_events: Vec<VisualEntity>,
    soups: Vec<VisualEntity>,
    soup_angle_degrees: f32,
    draw_list: DrawList,
    blocked: bool,
    closed: bool,
    employees_per_location: HashMap<Location, u32>,
}

impl Farm {
    pub fn new(slot: usize, placement: MapPlacement, config: &ViewerConfig) -> Self {
        Self {
            slot,
            placement,
            table: LocationTable::from_layout(&config.layout),
            sprites: config.sprites.clone(),
            employees: HashMap::new(),
            tractors: HashMap::new(),
            vegetables: Vec::new(),
            climate_events: Vec::new(),
            soups: Vec::new(),
            soup_angle_degrees: 0.0,
            draw_list: DrawList::default(),
            blocked: false,
            closed: false,
            employees_per_location: HashMap::new(),
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn placement(&self) -> MapPlacement {
        self.placement
    }

    pub fn location_table(&self) -> &LocationTable {
        &self.table
    }

    /// Moves the farm on the map; every registered token follows immediately.
    pub fn set_placement(&mut self, placement: MapPlacement) {
        self.placement = placement;
        let entities = self
            .employees
            .values()
            .chain(self.tractors.values())
            .chain(&self.vegetables)
            .chain(&self.climate_events)
            .chain(&self.soups);
        for entity in entities {
            sync_token(&mut self.draw_list, entity, &self.placement);
        }
    }

    pub fn update(&mut self, snapshot: &FarmSnapshot) {
        if snapshot.blocked && !self.blocked {
            warn!(farm = self.slot, "farm_blocked");
            self.blocked = true;
        }
        self.closed = snapshot.soup_factory.days_off != 0;

        self.update_employees(&snapshot.employees);
        self.update_tractors(&snapshot.tractors);
        self.rebuild_vegetables(&snapshot.fields);
        self.spawn_transients(&snapshot.events);

        debug!(
            farm = self.slot,
            employees = self.employees.len(),
            tractors = self.tractors.len(),
            vegetables = self.vegetables.len(),
            climate_events = self.climate_events.len(),
            soups = self.soups.len(),
            drawables = self.draw_list.len(),
            "snapshot_applied"
        );
    }

    fn update_employees(&mut self, records: &[WorkerSnapshot]) {
        self.reconcile_workers(WorkerRole::Employee, records);

        self.employees_per_location.clear();
        for record in records {
            if let Ok(location) = record.location.parse::<Location>() {
                *self.employees_per_location.entry(location).or_insert(0) += 1;
            }
        }
    }

    fn update_tractors(&mut self, records: &[WorkerSnapshot]) {
        self.reconcile_workers(WorkerRole::Tractor, records);
    }

    fn reconcile_workers(&mut self, role: WorkerRole, records: &[WorkerSnapshot]) {
        let workers = match role {
            WorkerRole::Employee => &mut self.employees,
            WorkerRole::Tractor => &mut self.tractors,
        };

        let mut seen = HashSet::with_capacity(records.len());
        for record in records {
            seen.insert(record.id);
            let worker = workers.entry(record.id).or_insert_with(|| {
                let mut worker = match role {
                    WorkerRole::Employee => {
                        VisualEntity::employee(record.id, &self.sprites, &self.table)
                    }
                    WorkerRole::Tractor => {
                        VisualEntity::tractor(record.id, &self.sprites, &self.table)
                    }
                };
                worker.attach(self.draw_list.insert(worker.to_token(&self.placement)));
                debug!(
                    farm = self.slot,
                    role = role.as_token(),
                    id = record.id,
                    "worker_spawned"
                );
                worker
            });
            match record.location.parse::<Location>() {
                Ok(location) => worker.set_target(location),
                Err(error) => warn!(
                    farm = self.slot,
                    role = role.as_token(),
                    id = record.id,
                    %error,
                    "worker_location_unknown; keeping previous target"
                ),
            }
        }

        let draw_list = &mut self.draw_list;
        let slot = self.slot;
        workers.retain(|id, worker| {
            if seen.contains(id) {
                return true;
            }
            if let Some(handle) = worker.handle() {
                draw_list.remove(handle);
            }
            debug!(farm = slot, role = role.as_token(), id = *id, "worker_retired");
            false
        });
    }

    fn rebuild_vegetables(&mut self, fields: &[FieldSnapshot]) {
        for vegetable in self.vegetables.drain(..) {
            if let Some(handle) = vegetable.handle() {
                self.draw_list.remove(handle);
            }
        }

        for field in fields {
            let location = match field.location.parse::<Location>() {
                Ok(location) => location,
                Err(error) => {
                    warn!(farm = self.slot, %error, "field_location_unknown; skipping field");
                    continue;
                }
            };
            let content = FieldContent::parse(&field.content);
            if let FieldContent::Unknown(name) = &content {
                warn!(
                    farm = self.slot,
                    location = location.as_token(),
                    crop = name.as_str(),
                    "crop_unknown; using fallback sprite"
                );
            }
            let mut vegetable = VisualEntity::vegetable(
                location,
                content,
                field.needed_water,
                &self.sprites,
                &self.table,
            );
            if vegetable.is_drawable() {
                vegetable.attach(self.draw_list.insert(vegetable.to_token(&self.placement)));
            }
            self.vegetables.push(vegetable);
        }
    }

    fn spawn_transients(&mut self, events: &[String]) {
        for request in decode_events(events) {
            match request {
                EventRequest::Soup { vegetables } => {
                    let mut soup = VisualEntity::soup(
                        self.soup_angle_degrees,
                        vegetables,
                        &self.sprites,
                        &self.table,
                    );
                    self.soup_angle_degrees += SOUP_ANGLE_STEP_DEGREES;
                    soup.attach(self.draw_list.insert(soup.to_token(&self.placement)));
                    self.soups.push(soup);
                }
                EventRequest::Climate { kind, target } => {
                    debug!(
                        farm = self.slot,
                        kind = ?kind,
                        target = target.as_token(),
                        "climate_event_started"
                    );
                    let mut event =
                        VisualEntity::climate(kind, target, &self.sprites, &self.table);
                    event.attach(self.draw_list.insert(event.to_token(&self.placement)));
                    self.climate_events.push(event);
                }
            }
        }
    }

    /// Advances every animated entity by one frame and retires finished
    /// transient effects.
    pub fn advance_frame(&mut self) {
        for worker in self.tractors.values_mut().chain(self.employees.values_mut()) {
            worker.step(&self.table);
            sync_token(&mut self.draw_list, worker, &self.placement);
        }

        advance_transients(
            &mut self.soups,
            &mut self.draw_list,
            &self.table,
            &self.placement,
        );
        advance_transients(
            &mut self.climate_events,
            &mut self.draw_list,
            &self.table,
            &self.placement,
        );
    }

    /// Submits live tokens in draw order, then the status overlays.
    pub fn submit<S: DrawSink + ?Sized>(&self, sink: &mut S) {
        self.draw_list.submit_all(sink);
        if self.blocked {
            sink.submit(&self.overlay_token(
                self.sprites.blocked.clone(),
                Location::Field3,
                BLOCKED_OVERLAY_SIZE,
            ));
        }
        if self.closed {
            sink.submit(&self.overlay_token(
                self.sprites.closed.clone(),
                Location::SoupFactory,
                CLOSED_OVERLAY_SIZE,
            ));
        }
    }

    pub fn draw<S: DrawSink + ?Sized>(&mut self, sink: &mut S) {
        self.advance_frame();
        self.submit(sink);
    }

    fn overlay_token(&self, sprite: SpriteKey, anchor: Location, size: f32) -> DrawToken {
        let local = Vec2 {
            x: self.table.position(anchor).x,
            y: 0.0,
        };
        DrawToken::square(sprite, self.placement.to_map(local), size)
    }

    pub fn blocked(&self) -> bool {
        self.blocked
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn employee(&self, id: u64) -> Option<&VisualEntity> {
        self.employees.get(&id)
    }

    pub fn tractor(&self, id: u64) -> Option<&VisualEntity> {
        self.tractors.get(&id)
    }

    pub fn employee_ids(&self) -> Vec<u64> {
        sorted_ids(&self.employees)
    }

    pub fn tractor_ids(&self) -> Vec<u64> {
        sorted_ids(&self.tractors)
    }

    /// Employees the latest snapshot placed at `location`.
    pub fn employees_at(&self, location: Location) -> u32 {
        self.employees_per_location
            .get(&location)
            .copied()
            .unwrap_or(0)
    }

    pub fn vegetables(&self) -> &[VisualEntity] {
        &self.vegetables
    }

    pub fn climate_events(&self) -> &[VisualEntity] {
        &self.climate_events
    }

    pub fn soups(&self) -> &[VisualEntity] {
        &self.soups
    }

    pub fn soup_angle_degrees(&self) -> f32 {
        self.soup_angle_degrees
    }

    /// Tokens registered for drawing, overlays excluded.
    pub fn drawable_count(&self) -> usize {
        self.draw_list.len()
    }

    pub fn is_registered(&self, entity: &VisualEntity) -> bool {
        entity
            .handle()
            .is_some_and(|handle| self.draw_list.contains(handle))
    }
}

fn advance_transients(
    entities: &mut Vec<VisualEntity>,
    draw_list: &mut DrawList,
    table: &LocationTable,
    placement: &MapPlacement,
) {
    entities.retain_mut(|entity| match entity.step(table) {
        Lifecycle::Alive => {
            sync_token(draw_list, entity, placement);
            true
        }
        Lifecycle::Retired => {
            if let Some(handle) = entity.handle() {
                draw_list.remove(handle);
            }
            false
        }
    });
}

fn sync_token(draw_list: &mut DrawList, entity: &VisualEntity, placement: &MapPlacement) {
    if let Some(token) = entity.handle().and_then(|handle| draw_list.get_mut(handle)) {
        entity.refresh_token(token, placement);
    }
}

fn sorted_ids(workers: &HashMap<u64, VisualEntity>) -> Vec<u64> {
    let mut ids = workers.keys().copied().collect::<Vec<_>>();
    ids.sort_unstable();
    ids
}
