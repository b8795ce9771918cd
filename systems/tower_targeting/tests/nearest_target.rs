use proptest::prelude::*;
use serpent_defence_core::{
    CellCoord, EnemyId, EnemyKind, EnemySnapshot, EnemyView, TowerId, TowerKind, TowerSnapshot,
    TowerView, WorldPoint,
};
use serpent_defence_system_tower_targeting::TowerTargeting;

fn tower_at(x: f32, y: f32) -> TowerSnapshot {
    let kind = TowerKind::Cannon;
    TowerSnapshot {
        id: TowerId::new(0),
        kind,
        cell: CellCoord::new(0, 0),
        position: WorldPoint::new(x, y),
        level: 1,
        sublevel: 0,
        stats: kind.base_stats(),
        cooldown_remaining: 0.0,
        invested: kind.cost(),
    }
}

fn enemies_from(points: &[(f32, f32)]) -> Vec<EnemySnapshot> {
    points
        .iter()
        .enumerate()
        .map(|(index, (x, y))| EnemySnapshot {
            id: EnemyId::new(index as u32),
            kind: EnemyKind::Standard,
            position: WorldPoint::new(*x, *y),
            progress: 0.0,
            health: 5.0,
            max_health: 5.0,
            speed: 1.0,
        })
        .collect()
}

proptest! {
    #[test]
    fn chosen_target_is_in_range_and_nearest(
        points in prop::collection::vec((0.0f32..16.0, 0.0f32..16.0), 1..24),
        tower_x in 0.0f32..16.0,
        tower_y in 0.0f32..16.0,
    ) {
        let tower = tower_at(tower_x, tower_y);
        let enemies = enemies_from(&points);
        let range_sq = tower.stats.range * tower.stats.range;

        let mut system = TowerTargeting::new();
        let mut out = Vec::new();
        system.handle(
            &TowerView::from_snapshots(vec![tower]),
            &EnemyView::from_snapshots(enemies.clone()),
            &mut out,
        );

        let in_range: Vec<&EnemySnapshot> = enemies
            .iter()
            .filter(|enemy| tower.position.distance_squared(enemy.position) <= range_sq)
            .collect();

        if in_range.is_empty() {
            prop_assert!(out.is_empty());
        } else {
            prop_assert_eq!(out.len(), 1);
            let chosen = enemies
                .iter()
                .find(|enemy| enemy.id == out[0].enemy)
                .expect("target refers to a live enemy");
            let chosen_sq = tower.position.distance_squared(chosen.position);
            prop_assert!(chosen_sq <= range_sq);
            for other in in_range {
                let other_sq = tower.position.distance_squared(other.position);
                prop_assert!(chosen_sq < other_sq || (chosen_sq == other_sq && chosen.id <= other.id));
            }
        }
    }

    #[test]
    fn snapshot_order_does_not_change_the_choice(
        points in prop::collection::vec((0.0f32..8.0, 0.0f32..8.0), 1..16),
    ) {
        let tower = tower_at(4.0, 4.0);
        let enemies = enemies_from(&points);
        let mut reversed = enemies.clone();
        reversed.reverse();

        let mut system = TowerTargeting::new();
        let mut forward_out = Vec::new();
        let mut reversed_out = Vec::new();
        system.handle(
            &TowerView::from_snapshots(vec![tower]),
            &EnemyView::from_snapshots(enemies),
            &mut forward_out,
        );
        system.handle(
            &TowerView::from_snapshots(vec![tower]),
            &EnemyView::from_snapshots(reversed),
            &mut reversed_out,
        );
        prop_assert_eq!(forward_out, reversed_out);
    }
}
