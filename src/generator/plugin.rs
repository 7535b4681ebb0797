// src/generator/plugin.rs

//! Bevy-Plugin, das Generierungen im Hintergrund auf dem `AsyncComputeTaskPool` ausführt.
//!
//! Anfrage: [`GeneratePattern`] (Szene + optionales Bild). Antwort: [`PatternGenerated`].
//! Jede Anfrage bekommt ein aufsteigendes Token; Ergebnisse, die älter sind als das
//! zuletzt übernommene, werden verworfen.

use std::collections::VecDeque;
use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future};

use super::buffer::PolygonBuffer;
use super::engine::generate_with_noise;
use super::scene::Scene;
use crate::color::raster::ImageRaster;
use crate::math::probability::noise::SimplexNoise;
use crate::math::probability::seed::SeedResource;

/// Anzahl gecachter Noise-Tabellen.
pub const NOISE_CACHE_CAPACITY: usize = 4;

pub struct PatternGeneratorPlugin;

impl Plugin for PatternGeneratorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NoiseTableCache>()
            .init_resource::<LatestPattern>()
            .init_resource::<PendingGenerations>()
            .add_event::<GeneratePattern>()
            .add_event::<PatternGenerated>()
            .add_systems(
                Update,
                (spawn_generation_tasks, collect_finished_generations).chain(),
            );
    }
}

/// Anfrage an den Hintergrund-Worker.
#[derive(Event, Debug, Clone)]
pub struct GeneratePattern {
    pub scene: Scene,
    pub image: Option<Arc<ImageRaster>>,
}

impl GeneratePattern {
    pub fn new(scene: Scene) -> Self {
        Self { scene, image: None }
    }

    pub fn with_image(mut self, image: Arc<ImageRaster>) -> Self {
        self.image = Some(image);
        self
    }
}

/// Fertiges Ergebnis einer Anfrage.
#[derive(Event, Debug, Clone)]
pub struct PatternGenerated {
    pub token: u64,
    pub buffer: Arc<PolygonBuffer>,
}

/// Zuletzt übernommenes Ergebnis, zusammen mit der Szene, aus der es stammt.
#[derive(Resource, Debug, Default)]
pub struct LatestPattern {
    pub token: Option<u64>,
    pub scene: Option<Scene>,
    pub buffer: Option<Arc<PolygonBuffer>>,
}

impl LatestPattern {
    /// Übernimmt ein Ergebnis, wenn es neuer ist als das aktuelle.
    pub fn accept(&mut self, token: u64, scene: Scene, buffer: PolygonBuffer) -> Option<Arc<PolygonBuffer>> {
        if self.token.is_some_and(|current| current >= token) {
            return None;
        }
        let buffer = Arc::new(buffer);
        self.token = Some(token);
        self.scene = Some(scene);
        self.buffer = Some(Arc::clone(&buffer));
        Some(buffer)
    }
}

/// Kleiner LRU-Cache für Noise-Tabellen, Schlüssel ist der numerische Seed.
/// Tabellen werden nie verändert; ein neuer Seed baut eine neue.
#[derive(Resource, Debug)]
pub struct NoiseTableCache {
    capacity: usize,
    entries: VecDeque<Arc<SimplexNoise>>,
}

impl NoiseTableCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, seed: u64) -> bool {
        self.entries.iter().any(|table| table.seed() == seed)
    }

    pub fn get_or_build(&mut self, seed: SeedResource) -> Arc<SimplexNoise> {
        if let Some(pos) = self.entries.iter().position(|t| t.seed() == seed.seed) {
            if let Some(table) = self.entries.remove(pos) {
                self.entries.push_front(Arc::clone(&table));
                return table;
            }
        }

        debug!("Building noise table for seed {}", seed.seed);
        let table = Arc::new(SimplexNoise::new(seed));
        self.entries.push_front(Arc::clone(&table));
        self.entries.truncate(self.capacity);
        table
    }
}

impl Default for NoiseTableCache {
    fn default() -> Self {
        Self::new(NOISE_CACHE_CAPACITY)
    }
}

struct PendingTask {
    token: u64,
    scene: Scene,
    task: Task<PolygonBuffer>,
}

#[derive(Resource, Default)]
struct PendingGenerations {
    next_token: u64,
    tasks: Vec<PendingTask>,
}

fn spawn_generation_tasks(
    mut requests: EventReader<GeneratePattern>,
    mut pending: ResMut<PendingGenerations>,
    mut cache: ResMut<NoiseTableCache>,
) {
    let pool = AsyncComputeTaskPool::get();
    for request in requests.read() {
        pending.next_token += 1;
        let token = pending.next_token;

        let simplex = cache.get_or_build(request.scene.noise.seed.to_resource());
        let scene = request.scene.clone();
        let image = request.image.clone();
        let task = pool.spawn(async move { generate_with_noise(&scene, image.as_deref(), simplex) });

        debug!("Spawned pattern generation #{token}");
        pending.tasks.push(PendingTask {
            token,
            scene: request.scene.clone(),
            task,
        });
    }
}

fn collect_finished_generations(
    mut pending: ResMut<PendingGenerations>,
    mut latest: ResMut<LatestPattern>,
    mut finished: EventWriter<PatternGenerated>,
) {
    let tasks = std::mem::take(&mut pending.tasks);
    for mut entry in tasks {
        let Some(buffer) = block_on(future::poll_once(&mut entry.task)) else {
            pending.tasks.push(entry);
            continue;
        };

        let polygons = buffer.polygon_count();
        match latest.accept(entry.token, entry.scene, buffer) {
            Some(buffer) => {
                info!("Pattern #{} ready with {polygons} polygons", entry.token);
                finished.send(PatternGenerated {
                    token: entry.token,
                    buffer,
                });
            }
            None => debug!("Dropping stale pattern #{}", entry.token),
        }
    }
}
