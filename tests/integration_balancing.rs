//! Integration tests for single balancing passes on hand-built scenarios.

mod common;

use grid_balancer::grid::{NodeId, TransferKind, topology};

#[test]
fn lone_transformer_overload_redirects_to_peer_with_room() {
    let mut grid = common::default_grid();
    grid.enqueue_demand(NodeId(3), 100, false).expect("node exists");
    grid.enqueue_demand(NodeId(3), 50, false).expect("node exists");
    let outcome = grid.balance();

    let t3 = common::node(&grid, 3);
    assert_eq!(t3.current_load, 100);
    assert_eq!(t3.health_score, 95);

    let overload = outcome
        .visit(NodeId(3))
        .and_then(|v| v.overload.clone())
        .expect("transformer 3 should overload");
    assert_eq!(overload.excess, 50);
    assert_eq!(overload.dropped, 0);
    assert_eq!(overload.transfers.len(), 1);
    assert_eq!(overload.transfers[0].kind, TransferKind::Peer);
    assert_eq!(overload.transfers[0].units, 50);

    let peer = common::node(&grid, overload.transfers[0].to.0);
    let pending = peer.demand_queue.all_pending();
    assert_eq!(pending.len(), 1);
    assert!(pending[0].is_critical);
    assert_eq!(pending[0].units, 50);
}

#[test]
fn lone_transformer_overload_drops_excess_when_no_peer_fits() {
    let mut grid = common::default_grid();
    for id in [4, 6, 7] {
        grid.enqueue_demand(NodeId(id), 60, false).expect("node exists");
    }
    grid.balance();

    grid.enqueue_demand(NodeId(3), 150, false).expect("node exists");
    let outcome = grid.balance();

    assert_eq!(common::node(&grid, 3).current_load, 100);
    assert_eq!(outcome.dropped_units(), 50);
    for id in [4, 6, 7] {
        assert_eq!(common::node(&grid, id).demand_queue.total_pending_units(), 60);
    }
}

#[test]
fn substation_excess_splits_evenly_between_children() {
    let mut grid = topology::build(2);
    grid.enqueue_demand(NodeId(1), 250, false).expect("node exists");
    let outcome = grid.balance();

    let sub = common::node(&grid, 1);
    assert_eq!(sub.capacity, 200);
    assert_eq!(sub.current_load, 200);
    assert_eq!(sub.health_score, 95);
    assert_eq!(outcome.transferred_units(TransferKind::Child), 50);

    // children are balanced later in the same pass and see the 25 units each
    for id in [2, 3] {
        let child = common::node(&grid, id);
        assert_eq!(child.current_load, 25);
        assert_eq!(child.demand_queue.all_pending().first().map(|d| d.is_critical), Some(true));
    }
}

#[test]
fn cascade_reaches_transformers_in_one_pass() {
    let mut grid = common::default_grid();
    grid.enqueue_demand(NodeId(1), 900, false).expect("node exists");
    let outcome = grid.balance();

    // 600 excess → 300 per substation → 100 excess each → 50 per transformer
    assert_eq!(common::node(&grid, 1).current_load, 300);
    for id in [2, 5] {
        assert_eq!(common::node(&grid, id).current_load, 200);
    }
    for id in [3, 4, 6, 7] {
        assert_eq!(common::node(&grid, id).current_load, 50);
    }
    assert_eq!(outcome.overloads().count(), 3);
    assert_eq!(outcome.visits.len(), 7);
    assert_eq!(outcome.dropped_units(), 0);
}

#[test]
fn inactive_subtree_is_frozen_for_the_pass() {
    let mut grid = common::default_grid();
    grid.enqueue_demand(NodeId(2), 120, false).expect("node exists");
    grid.enqueue_demand(NodeId(3), 80, false).expect("node exists");
    grid.balance();

    let before: Vec<_> = [2, 3, 4].iter().map(|&id| common::snapshot(&grid, id)).collect();
    grid.toggle_power(NodeId(2)).expect("node exists");
    grid.enqueue_demand(NodeId(3), 500, false).expect("node exists");
    let outcome = grid.balance();

    let after: Vec<_> = [2, 3, 4].iter().map(|&id| common::snapshot(&grid, id)).collect();
    assert_eq!(before, after);
    assert!(outcome.visit(NodeId(2)).is_none());
    assert!(outcome.visit(NodeId(3)).is_none());
    assert_eq!(outcome.visits.len(), 4);
}

#[test]
fn toggling_back_restores_processing() {
    let mut grid = common::default_grid();
    grid.enqueue_demand(NodeId(6), 40, false).expect("node exists");
    grid.toggle_power(NodeId(5)).expect("node exists");
    grid.balance();
    assert_eq!(common::node(&grid, 6).current_load, 0);
    assert!(common::node(&grid, 6).history.is_empty());

    grid.toggle_power(NodeId(5)).expect("node exists");
    grid.balance();
    assert_eq!(common::node(&grid, 6).current_load, 40);
    assert_eq!(common::node(&grid, 6).history.len(), 1);
}

#[test]
fn inactive_root_freezes_everything() {
    let mut grid = common::default_grid();
    grid.toggle_power(NodeId(1)).expect("node exists");
    grid.enqueue_demand(NodeId(4), 30, false).expect("node exists");
    let outcome = grid.balance();
    assert!(outcome.visits.is_empty());
    assert!(grid.nodes().iter().all(|n| n.history.is_empty()));
}

#[test]
fn pending_demand_accumulates_across_passes() {
    let mut grid = common::default_grid();
    grid.enqueue_demand(NodeId(1), 350, false).expect("node exists");
    for _ in 0..3 {
        grid.balance();
    }
    // 50 excess pushed as 25/25 every pass, never drained
    assert_eq!(common::node(&grid, 1).demand_queue.total_pending_units(), 350);
    assert_eq!(common::node(&grid, 2).demand_queue.total_pending_units(), 75);
    assert_eq!(common::node(&grid, 2).demand_queue.len(), 3);
    assert_eq!(common::node(&grid, 1).health_score, 85);
}

#[test]
fn report_rows_cover_each_pending_request_on_visited_nodes() {
    let mut grid = common::default_grid();
    grid.enqueue_demand(NodeId(3), 10, false).expect("node exists");
    grid.enqueue_demand(NodeId(3), 20, true).expect("node exists");
    grid.enqueue_demand(NodeId(6), 5, false).expect("node exists");
    let outcome = grid.balance();
    assert_eq!(outcome.records.len(), 3);
    assert!(outcome.records.iter().all(|r| r.node_id == NodeId(3) || r.node_id == NodeId(6)));
}
