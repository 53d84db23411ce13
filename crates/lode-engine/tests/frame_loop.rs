use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use lode_engine::tilemap::{CollisionMask, PropertyCollection, TileLayer, Tileset};
use lode_engine::{
    AtlasId, AtlasRegistry, BlendMode, Body, Camera, CollisionMode, CollisionTarget, Easing,
    EngineConfig, EngineContext, Entity, EntityPool, Game, GameRunner, InputEvent, InputQueue, Map,
    MapBuilder, ParticleController, ParticleSpawn, PoolId, Rect, RenderBuffer, Scene, SingleId,
    SpriteComponent,
};

const FIRE_KEY: u32 = 70;

struct Bullet {
    body: Body,
    hits: Rc<Cell<u32>>,
}

impl Entity for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn on_box_collision(&mut self, _other: &Body, _overlap: Rect) {
        self.hits.set(self.hits.get() + 1);
        self.body.active = false;
    }
}

struct Cavern {
    map: Option<Map>,
    atlases: AtlasRegistry,
    scene: Scene,
    bullets: PoolId,
    player: SingleId,
    particles: ParticleController,
    camera: Option<Camera>,
    hits: Rc<Cell<u32>>,
    shots: u32,
    pulse: f32,
    bursts: u32,
}

impl Cavern {
    fn new() -> Self {
        let hits = Rc::new(Cell::new(0));
        let pool_hits = hits.clone();
        let mut scene = Scene::new();
        let bullets = scene.add_pool(EntityPool::new(8, move || Bullet {
            body: Body::new(8, 8).with_sprite(SpriteComponent::new(AtlasId(9), Rect::new(0, 0, 8, 8))),
            hits: pool_hits.clone(),
        }));
        let player = scene.add_single(
            Body::new(16, 16)
                .with_tag("player")
                .with_position(Vec2::new(80.0, 40.0))
                .with_active(true),
        );
        assert!(scene.collide(bullets, CollisionTarget::Entity(player), CollisionMode::Box));

        Self {
            map: None,
            atlases: AtlasRegistry::new(),
            scene,
            bullets,
            player,
            particles: ParticleController::new(0),
            camera: None,
            hits,
            shots: 0,
            pulse: -1.0,
            bursts: 0,
        }
    }

    fn fire(&mut self) {
        let Some(pool) = self.scene.pool_mut::<Bullet>(self.bullets) else {
            return;
        };
        if pool
            .spawn(|b| {
                b.body.position = Vec2::new(20.0, 40.0);
                b.body.speed = Vec2::new(2.0, 0.0);
                b.body.sync_hit_box();
            })
            .is_some()
        {
            self.shots += 1;
        }
    }

    fn burst(&mut self) {
        self.bursts += 1;
        for i in 0..10 {
            let spawn = ParticleSpawn::new(Vec2::new(40.0 + i as f32, 20.0), Vec2::new(0.5, -1.0))
                .with_times(0.0, 0.5, 0.25)
                .with_gravity(true)
                .with_collision(true)
                .with_blend(BlendMode::Additive)
                .with_source(Rect::new(0, 0, 4, 4));
            self.particles.add(spawn);
        }
    }
}

fn cave_map() -> Map {
    let rock = CollisionMask::from_alpha(32, 16, &[255; 32 * 16]).unwrap();
    let mut floor = vec![0; 10 * 5];
    for cell in floor.iter_mut().skip(40) {
        *cell = 1;
    }
    MapBuilder::new(10, 5, 16, 16)
        .tileset(Tileset::new("rock", "rock.png", (32, 16), (16, 16)).with_mask(rock))
        .tile_layer(TileLayer::new("Back", 10, 5, vec![2; 50]))
        .tile_layer(
            TileLayer::new("Walls", 10, 5, floor)
                .with_properties(PropertyCollection::new().with("Collision", "")),
        )
        .build()
        .unwrap()
}

impl Game for Cavern {
    fn config(&self) -> EngineConfig {
        EngineConfig::from_json(r#"{ "max_particles": 64, "render_width": 160, "render_height": 80 }"#).unwrap()
    }

    fn init(&mut self, ctx: &mut EngineContext<Self>) {
        let mut map = cave_map();
        ctx.prepare_map(&mut map);
        map.register_atlases(&mut self.atlases);
        self.camera = Some(ctx.camera(Some(&map)));
        self.map = Some(map);
        self.particles = ctx.particles();

        ctx.timers.create("fire", 0.1, true, |game: &mut Cavern| game.fire());
        ctx.tweens.create("pulse", Easing::SineInOut, 1.0, true, true, |game: &mut Cavern, v| {
            game.pulse = v
        });
    }

    fn update(&mut self, ctx: &mut EngineContext<Self>, input: &InputQueue, dt: f32) {
        if input.key_pressed(FIRE_KEY) {
            self.burst();
        }
        self.scene.handle_input(input);
        self.scene.update(dt, self.map.as_ref());
        self.particles.update(dt, self.map.as_ref(), &mut ctx.rng);

        if let (Some(camera), Some(player)) = (self.camera.as_mut(), self.scene.single::<Body>(self.player)) {
            camera.target = player.position;
            camera.update(dt, &mut ctx.rng);
        }
    }

    fn render(&self, buffer: &mut RenderBuffer) {
        if let (Some(map), Some(camera)) = (&self.map, &self.camera) {
            map.draw(camera, buffer);
        }
        self.scene.draw(buffer);
        self.particles.draw(buffer);
    }
}

#[test]
fn frame_loop_runs_game_systems_together() {
    let mut runner = GameRunner::new(Cavern::new());
    runner.init();
    assert_eq!(runner.config().max_particles, 64);

    runner.push_input(InputEvent::KeyDown { key_code: FIRE_KEY });
    let mut steps = 0;
    for _ in 0..120 {
        steps += runner.tick(1.0 / 60.0);
    }
    assert_eq!(steps, 120);

    let game = runner.game();
    assert_eq!(game.bursts, 1);
    assert_eq!(game.atlases.len(), 1);
    assert!(game.shots >= 10, "shots = {}", game.shots);
    assert!(game.hits.get() > 0, "no bullet reached the player");
    // Every hit bullet went back to the pool.
    let pool = game.scene.pool::<Bullet>(game.bullets).unwrap();
    assert_eq!(pool.active_count() as u32, game.shots - game.hits.get());
    assert!((0.0..=1.0).contains(&game.pulse));
    // The burst has fully decayed after two seconds.
    assert_eq!(game.particles.active_count(), 0);

    let buffer = runner.render_buffer();
    assert!(buffer.instance_count() > 0);
    assert_eq!(buffer.batches()[0].blend, BlendMode::Alpha);
}

#[test]
fn particles_render_after_the_map_in_their_own_batch() {
    let mut runner = GameRunner::new(Cavern::new());
    runner.init();
    runner.push_input(InputEvent::KeyDown { key_code: FIRE_KEY });
    runner.tick(1.0 / 60.0);

    assert_eq!(runner.game().particles.active_count(), 10);
    let batches = runner.render_buffer().batches();
    let last = batches.last().unwrap();
    assert_eq!(last.blend, BlendMode::Additive);
    assert_eq!(last.len(), 10);
}
