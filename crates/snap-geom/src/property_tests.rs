use proptest::prelude::*;

use crate::{FitTolerance, QUARTER_PRIORITY, Rect, Zone};

const EPS: f64 = 1e-6;

fn area_strategy() -> impl Strategy<Value = Rect> {
    (
        -3000.0f64..3000.0,
        -3000.0f64..3000.0,
        1.0f64..6000.0,
        1.0f64..4000.0,
    )
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn quarters_partition_usable_area(area in area_strategy()) {
        let quarters: Vec<Rect> = QUARTER_PRIORITY.iter().map(|q| q.rect(area)).collect();
        let total: f64 = quarters.iter().map(Rect::area).sum();
        prop_assert!((total - area.area()).abs() <= EPS * area.area().max(1.0));
        for (i, a) in quarters.iter().enumerate() {
            prop_assert!(a.left() >= area.left() - EPS && a.right() <= area.right() + EPS);
            prop_assert!(a.top() >= area.top() - EPS && a.bottom() <= area.bottom() + EPS);
            for b in quarters.iter().skip(i + 1) {
                prop_assert!(a.intersection_area(b) <= EPS);
            }
        }
    }

    #[test]
    fn sibling_quarters_tile_parent_half(area in area_strategy()) {
        for half in Zone::HALVES {
            let [a, b] = half.quarters().expect("half");
            let (ra, rb, rh) = (a.rect(area), b.rect(area), half.rect(area));
            prop_assert!(ra.intersection_area(&rb) <= EPS);
            prop_assert!((ra.area() + rb.area() - rh.area()).abs() <= EPS * rh.area().max(1.0));
            prop_assert!(rh.intersection_area(&ra) >= ra.area() - EPS);
            prop_assert!(rh.intersection_area(&rb) >= rb.area() - EPS);
        }
    }

    #[test]
    fn tolerance_boundary(
        area in area_strategy(),
        dx in -4.9f64..4.9,
        dw in -19.9f64..19.9,
        extra in 0.5f64..50.0,
    ) {
        let tol = FitTolerance::CLEAN_FIT;
        let zone = Zone::RightHalf.rect(area);
        let near = Rect::new(zone.x + dx, zone.y, zone.w + dw, zone.h);
        prop_assert!(tol.matches(&near, &zone));
        let far = Rect::new(zone.x + tol.position + extra, zone.y, zone.w, zone.h);
        prop_assert!(!tol.matches(&far, &zone));
    }
}
