mod common;

use common::{cuff, setup, MockHost};
use cuffs::config::{CuffConfig, CuffModule};
use cuffs::controller::RestraintController;
use cuffs::host::{Cue, Posture};
use protocol::event::{HeldAction, HostEvent};
use protocol::{CreatureId, Side, V3};

fn reset(host: &mut MockHost, controller: &RestraintController) {
	controller.handle(host, &HostEvent::HeldAction(HeldAction::AlternateUseStart));
}

fn touch(host: &mut MockHost, controller: &RestraintController, creature: CreatureId, limb: &str) {
	let event = host.contact(creature, limb);
	controller.handle(host, &event);
}

fn tick(host: &mut MockHost, controller: &RestraintController, holder: V3) {
	controller.handle(host, &HostEvent::Tick { holder });
}

#[test]
fn left_then_right_wrist() {
	let (mut host, controller, module) = setup(CuffConfig::default());
	let a = host.add_creature(V3::zeros());

	touch(&mut host, &controller, a, "LeftWrist");
	let pr = controller.snapshot();
	let m = pr.member(a).unwrap();
	assert!(m.left);
	assert!(!m.right);
	assert!(!m.fully_restrained());
	assert_eq!(host.joints.len(), 1);
	assert!(!host.anchor_enabled(&module, Side::Left));
	assert!(host.anchor_enabled(&module, Side::Right));
	assert!(!host.creature(a).gripping[0]);
	assert!(host.creature(a).gripping[1]);
	assert!(host.creature(a).tags.is_empty());

	touch(&mut host, &controller, a, "RightWrist");
	let pr = controller.snapshot();
	assert!(pr.member(a).unwrap().fully_restrained());
	assert_eq!(pr.anchors_enabled, [false, false]);
	assert_eq!(host.joints_on(a), 2);
	assert_eq!(host.count(Cue::Attach), 2);

	let c = host.creature(a);
	assert_eq!(c.tags.len(), 1);
	assert!(c.tags.contains(&controller.tag()));
	assert_eq!(c.stops, 1);
	assert_eq!(c.posture, Posture::Destabilized);
}

#[test]
fn joint_carries_config() {
	let config = CuffConfig {
		spring: 800.0,
		joint_offset: 0.1,
		..Default::default()
	};
	let (mut host, controller, module) = setup(config);
	let a = host.add_creature(V3::zeros());
	touch(&mut host, &controller, a, "RightWrist");

	let joint = host.joints.values().next().unwrap();
	let wrist = host.creature(a).limbs["RightWrist"];
	let cuff = host.refs[&module.unity_body_right_ref][0];
	assert_eq!(joint.connected, wrist);
	assert_eq!(joint.owner, host.colliders[&cuff].0);
	assert_eq!(joint.desc.anchor, V3::new(0.0, 0.0, 0.1));
	assert_eq!(joint.desc.linear_drive.spring, 800.0);
	assert_eq!(joint.desc.angular_drive.spring, 400.0);
	assert!(host.dynamic.contains(&wrist));
}

#[test]
fn repeated_contact_is_noop() {
	let (mut host, controller, _) = setup(CuffConfig::default());
	let a = host.add_creature(V3::zeros());
	for _ in 0..3 {
		touch(&mut host, &controller, a, "LeftWrist");
	}
	assert_eq!(host.joints.len(), 1);
	assert_eq!(host.count(Cue::Attach), 1);

	cuff(&mut host, &controller, a);
	cuff(&mut host, &controller, a);
	assert_eq!(host.joints.len(), 2);
	assert_eq!(host.creature(a).stops, 1);
}

#[test]
fn untracked_limb_only_admits() {
	let (mut host, controller, _) = setup(CuffConfig::default());
	let a = host.add_creature(V3::zeros());
	touch(&mut host, &controller, a, "Head");
	touch(&mut host, &controller, a, "LeftHand");
	let pr = controller.snapshot();
	assert_eq!(pr.len(), 1);
	assert_eq!(pr.active, Some(a));
	assert!(host.joints.is_empty());
}

#[test]
fn player_and_loose_bodies_ignored() {
	let (mut host, controller, _) = setup(CuffConfig::default());
	let me = host.add_creature(V3::zeros());
	host.player = Some(me);
	touch(&mut host, &controller, me, "LeftWrist");
	let wrist = host.creature(me).limbs["RightWrist"];
	controller.handle(
		&mut host,
		&HostEvent::Contact {
			body: wrist,
			creature: None,
		},
	);
	assert!(controller.snapshot().is_empty());
	assert!(host.joints.is_empty());
}

#[test]
fn cooldown_after_reset() {
	let (mut host, controller, _) = setup(CuffConfig::default().with_cooldown(1.5));
	let a = host.add_creature(V3::zeros());

	// no reset yet, no window
	touch(&mut host, &controller, a, "LeftWrist");
	assert_eq!(host.joints.len(), 1);

	host.time = 10.0;
	reset(&mut host, &controller);
	host.time = 11.0;
	touch(&mut host, &controller, a, "LeftWrist");
	assert!(controller.snapshot().is_empty());
	assert!(host.joints.is_empty());

	host.time = 12.0;
	touch(&mut host, &controller, a, "LeftWrist");
	assert_eq!(host.joints.len(), 1);
}

#[test]
fn drag_reapplies_effects() {
	let (mut host, controller, _) = setup(CuffConfig::default().with_drag_distance(2.0));
	let a = host.add_creature(V3::new(5.0, 0.0, 0.0));
	let b = host.add_creature(V3::new(5.0, 0.0, 1.0));
	cuff(&mut host, &controller, a);
	touch(&mut host, &controller, b, "LeftWrist");
	assert_eq!(host.creature(a).stops, 1);

	tick(&mut host, &controller, V3::new(4.0, 0.0, 0.0));
	assert_eq!(host.creature(a).stops, 1);

	tick(&mut host, &controller, V3::zeros());
	tick(&mut host, &controller, V3::zeros());
	assert_eq!(host.creature(a).stops, 3);
	assert_eq!(host.creature(a).tags.len(), 1);
	// not fully restrained, never dragged
	assert_eq!(host.creature(b).stops, 0);
	assert!(host.creature(b).tags.is_empty());

	controller.handle(&mut host, &HostEvent::Ungrab { throwing: false });
	tick(&mut host, &controller, V3::zeros());
	assert_eq!(host.creature(a).stops, 3);
}

#[test]
fn drag_respects_toggles() {
	let config = CuffConfig::default().with_effects(false, false);
	let (mut host, controller, _) = setup(config);
	let a = host.add_creature(V3::new(5.0, 0.0, 0.0));
	cuff(&mut host, &controller, a);
	tick(&mut host, &controller, V3::zeros());
	let c = host.creature(a);
	assert!(c.tags.is_empty());
	assert_eq!(c.stops, 0);
	assert_eq!(c.posture, Posture::Standing);
}

#[test]
fn killed_member_dropped_on_tick() {
	let (mut host, controller, module) = setup(CuffConfig::default());
	let a = host.add_creature(V3::zeros());
	let b = host.add_creature(V3::zeros());
	touch(&mut host, &controller, a, "LeftWrist");
	touch(&mut host, &controller, b, "RightWrist");
	assert_eq!(controller.snapshot().active, Some(b));

	host.creatures.get_mut(&b).unwrap().killed = true;
	tick(&mut host, &controller, V3::zeros());

	let pr = controller.snapshot();
	assert_eq!(pr.len(), 1);
	assert_eq!(pr.active, Some(a));
	assert_eq!(host.joints_on(b), 0);
	assert_eq!(host.joints_on(a), 1);
	assert!(host.anchor_enabled(&module, Side::Right));
	assert!(!host.anchor_enabled(&module, Side::Left));
	assert_eq!(host.count(Cue::Detach), 1);
}

#[test]
fn reset_mid_chain() {
	let (mut host, controller, module) = setup(CuffConfig::default());
	let a = host.add_creature(V3::zeros());
	let b = host.add_creature(V3::zeros());
	cuff(&mut host, &controller, a);
	touch(&mut host, &controller, b, "LeftWrist");
	assert_eq!(host.joints.len(), 3);
	for c in host.item_colliders() {
		host.colliders.get_mut(&c).unwrap().1 = false;
	}

	reset(&mut host, &controller);
	let pr = controller.snapshot();
	assert!(pr.is_empty());
	assert_eq!(pr.active, None);
	assert!(!pr.complete);
	assert!(host.joints.is_empty());
	assert_eq!(host.destroyed, 3);
	assert!(host.all_enabled());
	assert!(host.creature(a).tags.is_empty());
	assert_eq!(host.count(Cue::Reset), 1);

	reset(&mut host, &controller);
	assert!(controller.snapshot().is_empty());
	assert_eq!(host.destroyed, 3);
	assert!(host.all_enabled());
	assert!(host.anchor_enabled(&module, Side::Left));

	// the chain starts over
	host.time += 5.0;
	cuff(&mut host, &controller, b);
	assert!(controller.snapshot().member(b).unwrap().fully_restrained());
}

#[test]
fn reset_keeps_tags_when_disabled() {
	let config = CuffConfig {
		reset_removes_no_standup: false,
		..Default::default()
	};
	let (mut host, controller, _) = setup(config);
	let a = host.add_creature(V3::zeros());
	cuff(&mut host, &controller, a);
	controller.manual_reset(&mut host);
	assert_eq!(host.creature(a).tags.len(), 1);
}

#[test]
fn multi_chain_capacity() {
	let (mut host, controller, _) = setup(CuffConfig::default().with_chain(true, 3));
	let ids: Vec<CreatureId> = (0..4).map(|_| host.add_creature(V3::zeros())).collect();
	for c in &ids[..3] {
		touch(&mut host, &controller, *c, "LeftWrist");
	}
	touch(&mut host, &controller, ids[3], "LeftWrist");
	assert_eq!(controller.snapshot().len(), 3);
	assert_eq!(host.joints_on(ids[3]), 0);

	for c in &ids[..3] {
		touch(&mut host, &controller, *c, "RightWrist");
	}
	let pr = controller.snapshot();
	assert!(pr.complete);
	for c in &ids[..3] {
		assert!(pr.member(*c).unwrap().fully_restrained());
	}
	touch(&mut host, &controller, ids[3], "RightWrist");
	assert_eq!(host.joints_on(ids[3]), 0);
	assert_eq!(controller.snapshot().len(), 3);
}

#[test]
fn single_chain_waits_for_removal() {
	let (mut host, controller, _) = setup(CuffConfig::default().with_chain(false, 3));
	let a = host.add_creature(V3::zeros());
	let b = host.add_creature(V3::zeros());
	touch(&mut host, &controller, a, "LeftWrist");
	touch(&mut host, &controller, b, "LeftWrist");
	assert_eq!(host.joints_on(b), 0);

	touch(&mut host, &controller, a, "RightWrist");
	assert!(controller.snapshot().member(a).unwrap().fully_restrained());
	touch(&mut host, &controller, b, "LeftWrist");
	assert_eq!(host.joints_on(b), 0);

	host.creatures.get_mut(&a).unwrap().killed = true;
	tick(&mut host, &controller, V3::zeros());
	assert!(controller.snapshot().is_empty());

	touch(&mut host, &controller, b, "LeftWrist");
	assert_eq!(host.joints_on(b), 1);
	assert_eq!(controller.snapshot().active, Some(b));
}

#[test]
fn completion_gated_on_active() {
	let (mut host, controller, _) = setup(CuffConfig::default().with_chain(true, 2));
	let a = host.add_creature(V3::zeros());
	let b = host.add_creature(V3::zeros());
	let c = host.add_creature(V3::zeros());
	touch(&mut host, &controller, a, "LeftWrist");
	touch(&mut host, &controller, b, "LeftWrist");
	touch(&mut host, &controller, a, "RightWrist");
	// a is active again and fully restrained with two members
	assert!(controller.snapshot().complete);

	touch(&mut host, &controller, c, "LeftWrist");
	assert_eq!(host.joints_on(c), 0);
	touch(&mut host, &controller, b, "RightWrist");
	let pr = controller.snapshot();
	assert!(pr.complete);
	assert!(pr.member(b).unwrap().fully_restrained());

	reset(&mut host, &controller);
	assert!(!controller.snapshot().complete);
}

#[test]
fn completion_waits_for_later_member() {
	let (mut host, controller, _) = setup(CuffConfig::default().with_chain(true, 2));
	let a = host.add_creature(V3::zeros());
	let b = host.add_creature(V3::zeros());
	cuff(&mut host, &controller, a);
	assert!(!controller.snapshot().complete);
	touch(&mut host, &controller, b, "LeftWrist");
	assert!(!controller.snapshot().complete);
	touch(&mut host, &controller, b, "RightWrist");
	assert!(controller.snapshot().complete);
}

#[test]
fn failed_attach_rolls_back() {
	let (mut host, controller, module) = setup(CuffConfig::default());
	let a = host.add_creature(V3::zeros());
	host.fail_joints = true;
	touch(&mut host, &controller, a, "LeftWrist");
	assert!(host.joints.is_empty());
	assert!(host.anchor_enabled(&module, Side::Left));
	assert!(!controller.snapshot().member(a).unwrap().left);
	assert_eq!(host.count(Cue::Attach), 0);
	assert!(host.creature(a).gripping[0]);

	host.fail_joints = false;
	touch(&mut host, &controller, a, "LeftWrist");
	assert_eq!(host.joints.len(), 1);
	assert!(controller.snapshot().member(a).unwrap().left);
}

#[test]
fn failed_attach_mid_chain_enables_anchor() {
	let (mut host, controller, module) = setup(CuffConfig::default());
	let a = host.add_creature(V3::zeros());
	let b = host.add_creature(V3::zeros());
	touch(&mut host, &controller, a, "LeftWrist");
	assert!(!host.anchor_enabled(&module, Side::Left));

	host.fail_joints = true;
	touch(&mut host, &controller, b, "LeftWrist");
	assert!(host.anchor_enabled(&module, Side::Left));
	assert_eq!(host.joints_on(a), 1);
	let pr = controller.snapshot();
	assert!(pr.member(a).unwrap().left);
	assert!(!pr.member(b).unwrap().left);
}

#[test]
fn failed_effects_do_not_abort() {
	let (mut host, controller, _) = setup(CuffConfig::default().with_chain(true, 1));
	let a = host.add_creature(V3::new(9.0, 0.0, 0.0));
	host.fail_effects = true;
	cuff(&mut host, &controller, a);
	let pr = controller.snapshot();
	assert!(pr.member(a).unwrap().fully_restrained());
	assert!(pr.complete);
	assert_eq!(host.joints.len(), 2);
	assert_eq!(host.creature(a).stops, 0);

	tick(&mut host, &controller, V3::zeros());
	reset(&mut host, &controller);
	assert!(host.joints.is_empty());
}

#[test]
fn killed_creature_goes_inert() {
	let (mut host, controller, _) = setup(CuffConfig::default());
	let a = host.add_creature(V3::zeros());
	touch(&mut host, &controller, a, "LeftWrist");
	host.creatures.get_mut(&a).unwrap().killed = true;
	touch(&mut host, &controller, a, "RightWrist");
	assert_eq!(host.creature(a).posture, Posture::Inert);
}

#[test]
fn lifecycle_and_visibility() {
	let module = CuffModule::default();
	let mut host = MockHost::with_item(&module);
	let controller =
		RestraintController::try_init(CuffConfig::from_module(&module), &module, &host, &host)
			.unwrap();
	let a = host.add_creature(V3::zeros());

	// not registered yet
	touch(&mut host, &controller, a, "LeftWrist");
	assert!(host.joints.is_empty());

	controller.register(&mut host);
	assert_eq!(host.visible, Some(false));
	controller.handle(&mut host, &HostEvent::Unsnap);
	assert_eq!(host.visible, Some(true));
	assert!(controller.is_visible());
	controller.handle(&mut host, &HostEvent::Snap);
	assert_eq!(host.visible, Some(false));

	controller.handle(&mut host, &HostEvent::Grab);
	assert!(controller.is_gripped());
	controller.handle(&mut host, &HostEvent::HeldAction(HeldAction::UseStart));
	assert_eq!(host.count(Cue::Reset), 0);

	touch(&mut host, &controller, a, "LeftWrist");
	assert_eq!(host.joints.len(), 1);

	controller.unregister();
	assert!(!controller.is_registered());
	touch(&mut host, &controller, a, "RightWrist");
	assert_eq!(host.joints.len(), 1);
}

#[test]
fn init_fails_without_parts() {
	let module = CuffModule::default();
	let mut host = MockHost::with_item(&module);
	host.refs.remove(&module.unity_body_left_ref);
	let controller =
		RestraintController::try_init(CuffConfig::default(), &module, &host, &host);
	assert!(controller.is_none());

	let mut host = MockHost::with_item(&module);
	host.sounds.clear();
	assert!(
		RestraintController::try_init(CuffConfig::default(), &module, &host, &host).is_none()
	);

	let host = MockHost::with_item(&module);
	let bad = CuffConfig::default().with_chain(true, 0);
	assert!(RestraintController::try_init(bad, &module, &host, &host).is_none());
}

#[test]
fn controllers_use_distinct_tags() {
	let (mut host, first, _) = setup(CuffConfig::default());
	let module = CuffModule::default();
	let components = cuffs::controller::Components::resolve(&host, &host, &module).unwrap();
	let second = RestraintController::new(
		CuffConfig::default().with_targets("LeftWrist", "RightWrist"),
		components,
	)
	.unwrap();
	assert_ne!(first.tag(), second.tag());

	second.register(&mut host);
	let a = host.add_creature(V3::zeros());
	cuff(&mut host, &first, a);
	host.creatures.get_mut(&a).unwrap().tags.insert(second.tag());
	reset(&mut host, &first);
	let tags = &host.creature(a).tags;
	assert_eq!(tags.len(), 1);
	assert!(tags.contains(&second.tag()));
}
