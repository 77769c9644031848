// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_fastener` crate.
//!
//! These exercise inheritance across an owner chain, cascade exclusivity,
//! affinity arbitration, and the lifecycle event stream.

use std::cell::RefCell;
use std::rc::Rc;

use understory_fastener::{
    Affinity, Fastener, FastenerDescriptor, FastenerFlags, FastenerPhase, FastenerTree,
    OwnerClass, OwnerId,
};

const RED: u32 = 0xFF0000;
const GREEN: u32 = 0x00FF00;
const BLUE: u32 = 0x0000FF;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn color() -> FastenerDescriptor<u32> {
    FastenerDescriptor::property("color").default(0).inherit(true)
}

struct Chain {
    tree: FastenerTree,
    owners: [OwnerId; 3],
    colors: [Fastener<u32>; 3],
}

/// `Root -> Mid -> Leaf`, each declaring `color`.
fn chain() -> Chain {
    init_tracing();
    let view = OwnerClass::new("View").declare(color());
    let mut tree = FastenerTree::new();
    let root = tree.insert_root_with(&view);
    let mid = tree.insert_child_with(root, &view);
    let leaf = tree.insert_child_with(mid, &view);
    let colors = [root, mid, leaf].map(|owner| {
        tree.fastener::<u32>(owner, "color")
            .expect("declared by the View class")
    });
    Chain {
        tree,
        owners: [root, mid, leaf],
        colors,
    }
}

#[test]
fn root_value_reaches_every_descendant() {
    let Chain {
        mut tree,
        owners: [root, ..],
        colors: [root_color, mid_color, leaf_color],
    } = chain();

    tree.set_state(root_color, RED);
    tree.mount(root);

    assert_eq!(tree.state(mid_color), Some(&RED));
    assert_eq!(tree.state(leaf_color), Some(&RED));
    assert!(tree.is_inherited(mid_color.id()));
    assert!(tree.is_inherited(leaf_color.id()));
}

#[test]
fn explicit_leaf_value_blocks_later_cascades() {
    let Chain {
        mut tree,
        owners: [root, ..],
        colors: [root_color, mid_color, leaf_color],
    } = chain();
    tree.set_state(root_color, RED);
    tree.mount(root);

    tree.set_state(leaf_color, BLUE);
    assert_eq!(tree.state(leaf_color), Some(&BLUE));
    assert_eq!(tree.state(mid_color), Some(&RED));
    assert!(tree.flags(leaf_color.id()).contains(FastenerFlags::OVERRIDDEN));

    tree.set_state(root_color, GREEN);
    assert_eq!(tree.state(leaf_color), Some(&BLUE));
    assert_eq!(tree.state(mid_color), Some(&GREEN));
}

#[test]
fn cascade_skips_overridden_subtrees() {
    let Chain {
        mut tree,
        owners: [root, mid, leaf],
        colors: [root_color, mid_color, leaf_color],
    } = chain();
    tree.mount(root);
    tree.set_state(mid_color, BLUE);

    let updated = Rc::new(RefCell::new(Vec::new()));
    let sink = updated.clone();
    tree.add_listener(move |event| {
        if event.phase == FastenerPhase::Update {
            sink.borrow_mut().push(event.owner);
        }
    });
    tree.set_state(root_color, RED);

    // The leaf still inherits, but only from `mid`, which holds its own value.
    assert_eq!(*updated.borrow(), vec![root]);
    assert_eq!(tree.state(leaf_color), Some(&BLUE));
    assert_eq!(tree.super_fastener(leaf_color.id()), Some(mid_color.id()));
    assert!(!updated.borrow().contains(&mid));
    assert!(!updated.borrow().contains(&leaf));
}

#[test]
fn automatic_writes_defer_to_user_writes() {
    let Chain {
        mut tree,
        owners: [root, ..],
        colors: [root_color, ..],
    } = chain();
    tree.mount(root);

    assert!(tree.set_auto_state(root_color, RED));
    assert_eq!(tree.affinity(root_color.id()), Some(Affinity::Intrinsic));

    assert!(tree.set_state_with(root_color, GREEN, Affinity::Extrinsic));
    assert!(!tree.set_auto_state(root_color, BLUE));
    assert!(!tree.set_state_with(root_color, BLUE, Affinity::Inherited));
    assert_eq!(tree.state(root_color), Some(&GREEN));

    // Equal affinity replaces.
    assert!(tree.set_state_with(root_color, BLUE, Affinity::Extrinsic));
    assert_eq!(tree.state(root_color), Some(&BLUE));

    // Unconditional writes always land and keep the stronger affinity.
    tree.set_state_with(root_color, RED, Affinity::Reflexive);
    tree.set_state(root_color, GREEN);
    assert_eq!(tree.state(root_color), Some(&GREEN));
    assert_eq!(tree.affinity(root_color.id()), Some(Affinity::Reflexive));
}

#[test]
fn unmounting_returns_to_default() {
    let Chain {
        mut tree,
        owners: [root, mid, _],
        colors: [root_color, mid_color, leaf_color],
    } = chain();
    tree.set_state(root_color, RED);
    tree.mount(root);

    tree.unmount(mid);
    assert_eq!(tree.state(mid_color), Some(&0));
    assert_eq!(tree.state(leaf_color), Some(&0));
    assert!(tree.sub_fasteners(root_color.id()).is_empty());

    tree.mount(mid);
    assert_eq!(tree.state(leaf_color), Some(&RED));
}

#[test]
fn write_phases_are_reported_in_order() {
    let Chain {
        mut tree,
        owners: [root, mid, leaf],
        colors: [root_color, ..],
    } = chain();
    tree.mount(root);

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    tree.add_listener(move |event| {
        sink.borrow_mut().push((event.owner, event.phase));
    });
    tree.set_state(root_color, RED);

    use FastenerPhase::*;
    assert_eq!(
        *events.borrow(),
        vec![
            (root, WillSetState),
            (root, WillUpdate),
            (root, SetState),
            (root, Update),
            (mid, WillUpdate),
            (mid, Update),
            (leaf, WillUpdate),
            (leaf, Update),
            (leaf, DidUpdate),
            (mid, DidUpdate),
            (root, DidUpdate),
            (root, DidSetState),
        ]
    );
}

#[test]
fn changed_callbacks_see_old_and_new_values() {
    init_tracing();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let mut tree = FastenerTree::new();
    let root = tree.insert_root();
    let child = tree.insert_child(root);
    let root_color = tree.insert_fastener(root, FastenerDescriptor::property("color").default(0_u32));
    tree.insert_fastener(
        child,
        FastenerDescriptor::property("color")
            .default(0_u32)
            .inherit(true)
            .on_changed(move |old, new| sink.borrow_mut().push((old.copied(), *new))),
    );
    tree.mount(root);

    tree.set_state(root_color, RED);
    tree.set_state(root_color, GREEN);
    assert_eq!(*seen.borrow(), vec![(Some(0), RED), (Some(RED), GREEN)]);
}

#[test]
fn unmounting_a_middle_fastener_rebinds_its_subs_past_it() {
    let Chain {
        mut tree,
        owners: [root, ..],
        colors: [root_color, mid_color, leaf_color],
    } = chain();
    tree.set_state(root_color, RED);
    tree.mount(root);

    tree.unmount_fastener(mid_color.id());
    assert_eq!(tree.super_fastener(leaf_color.id()), Some(root_color.id()));
    assert!(tree.sub_fasteners(mid_color.id()).is_empty());
    assert_eq!(tree.sub_fasteners(root_color.id()), &[leaf_color.id()]);
    assert_eq!(tree.state(leaf_color), Some(&RED));
    assert_eq!(tree.state(mid_color), Some(&0));

    // Remounting takes the leaf back.
    tree.mount_fastener(mid_color.id());
    assert_eq!(tree.super_fastener(mid_color.id()), Some(root_color.id()));
    assert_eq!(tree.super_fastener(leaf_color.id()), Some(mid_color.id()));
    assert_eq!(tree.sub_fasteners(root_color.id()), &[mid_color.id()]);
    assert_eq!(tree.sub_fasteners(mid_color.id()), &[leaf_color.id()]);
    assert_eq!(tree.state(leaf_color), Some(&RED));
}

#[test]
fn mounting_through_lazy_ancestors_updates_once() {
    init_tracing();
    let view = OwnerClass::new("View").declare(
        FastenerDescriptor::property("color")
            .default(BLUE)
            .inherit(true),
    );
    let mut tree = FastenerTree::new();
    let root = tree.insert_root_with(&view);
    let mid = tree.insert_child_with(root, &view);
    let leaf = tree.insert_child(mid);
    let leaf_color = tree.insert_fastener(leaf, color());

    let updates = Rc::new(RefCell::new(Vec::new()));
    let sink = updates.clone();
    let leaf_id = leaf_color.id();
    tree.add_listener(move |event| {
        if event.fastener == leaf_id {
            sink.borrow_mut().push((event.phase, event.new_as::<u32>().copied()));
        }
    });
    tree.mount(root);

    use FastenerPhase::*;
    assert_eq!(
        *updates.borrow(),
        vec![
            (Bind, None),
            (WillUpdate, Some(BLUE)),
            (Update, Some(BLUE)),
            (DidUpdate, Some(BLUE)),
        ]
    );
    assert_eq!(
        tree.super_fastener(leaf_color.id()),
        tree.get_fastener(mid, "color")
    );
}
