use std::time::SystemTime;

use cuffs::config::{CuffConfig, CuffModule};
use cuffs::controller::RestraintController;
use cuffs::host::Creatures;
use cuffs::sim::SimHost;
use protocol::event::{HeldAction, HostEvent};
use protocol::{CreatureId, V3};
use xpbd::posbox::Posbox;
use xpbd::pworld::PWorld;

fn touch(
	host: &mut SimHost,
	controller: &RestraintController,
	creature: CreatureId,
	limb: &str,
) {
	if let Some(event) = host.contact_with(creature, limb) {
		controller.handle(host, &event);
	}
}

// two creatures chained by one pair of cuffs, then dragged around
fn main() {
	let module = CuffModule::default();
	let config = CuffConfig::from_module(&module).with_chain(true, 2);

	let world = PWorld::default().with_posbox(Posbox::floor(10., 4.));
	let mut host = SimHost::new(world);
	let player = host.spawn_player(V3::zeros());
	let a = host.spawn_creature(V3::new(1., 0., 0.));
	let b = host.spawn_creature(V3::new(-1., 0., 0.));
	if let Err(e) = host.spawn_restraint(&module, V3::new(0., 1., 0.5)) {
		eprintln!("ERROR: {}", e);
		return;
	}

	let controller =
		match RestraintController::try_init(config, &module, &host, &host.world) {
			Some(c) => c,
			None => {
				eprintln!("ERROR: restraint failed to initialize");
				return;
			}
		};
	controller.register(&mut host);
	controller.handle(&mut host, &HostEvent::Unsnap);
	controller.handle(&mut host, &HostEvent::Grab);

	for creature in [a, b] {
		touch(&mut host, &controller, creature, "LeftWrist");
		host.step();
		touch(&mut host, &controller, creature, "RightWrist");
		host.step();
	}

	let start = SystemTime::now();
	let rframes = 100;
	for frame in 0..rframes {
		// the player walks away, dragging the chain
		if let Err(e) = host.shift_creature(player, V3::new(0., 0., 0.05)) {
			eprintln!("ERROR: {}", e);
		}
		let holder = host.position(player).unwrap_or_default();
		controller.handle(&mut host, &HostEvent::Tick { holder });
		host.step();
		if frame % 25 == 0 {
			eprintln!("{:?}", controller.snapshot());
		}
	}
	let time = rframes as f32 * host.world.dt * host.world.ppr as f32;
	let duration = SystemTime::now()
		.duration_since(start)
		.map(|d| d.as_micros())
		.unwrap_or_default();

	for creature in [a, b] {
		if let Some(c) = host.creature(creature) {
			eprintln!(
				"{}: {:?}, {} tags, stopped {} times",
				creature,
				c.posture,
				c.no_standup.len(),
				c.actions_stopped
			);
		}
	}
	eprintln!("joints before reset: {}", host.world.joint_count());
	controller.handle(
		&mut host,
		&HostEvent::HeldAction(HeldAction::AlternateUseStart),
	);
	eprintln!(
		"joints after reset: {}, cues {:?}",
		host.world.joint_count(),
		host.cues
	);
	eprintln!("{:?} {:.3}%", host.world.len(), duration as f32 / time / 1e4);
}
