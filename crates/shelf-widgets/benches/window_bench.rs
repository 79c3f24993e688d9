//! Benchmarks for windowing and sorting.
//!
//! Run with: cargo bench -p shelf-widgets

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use shelf_core::event::ViewportEvent;
use shelf_core::geometry::{Size, Viewport};
use shelf_widgets::grid::WindowedGrid;
use shelf_widgets::record::{FieldValue, Record};
use shelf_widgets::sort::{SortConfig, SortField, apply_sort, sort_indices};
use shelf_widgets::virtualized::WindowedList;
use shelf_widgets::{ItemExtent, Window, compute_visible_range};
use std::hint::black_box;

#[derive(Clone)]
struct Item {
    id: usize,
    name: String,
    price: f64,
    updated: String,
}

impl Record for Item {
    type Id = usize;

    fn id(&self) -> usize {
        self.id
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => FieldValue::text(&self.name),
            "price" => self.price.into(),
            "updated" => FieldValue::text(&self.updated),
            _ => FieldValue::Null,
        }
    }
}

fn inventory(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item {
            id: i,
            name: format!("Item {:05}", (i * 7919) % n.max(1)),
            price: ((i * 31) % 500) as f64 / 4.0,
            updated: format!("2024-{:02}-{:02}T12:00:00Z", i % 12 + 1, i % 28 + 1),
        })
        .collect()
}

fn row_height() -> ItemExtent {
    ItemExtent::new(60).expect("non-zero row height")
}

// ============================================================================
// Range calculator
// ============================================================================

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("window/range");
    let h = row_height();

    for count in [1_000usize, 100_000, 10_000_000] {
        group.bench_with_input(BenchmarkId::new("compute", count), &count, |b, &count| {
            let mut offset = 0u32;
            b.iter(|| {
                offset = offset.wrapping_add(97) % (count as u32).saturating_mul(60).max(1);
                let r = compute_visible_range(black_box(offset), 900, h, count, 5);
                black_box(Window::new(r, h, count))
            })
        });
    }

    group.finish();
}

// ============================================================================
// Containers
// ============================================================================

fn bench_containers(c: &mut Criterion) {
    let mut group = c.benchmark_group("window/container");
    let items = inventory(10_000);

    group.bench_function("list_frame_burst", |b| {
        let mut list = WindowedList::new(items.len(), row_height())
            .with_viewport(Viewport::new(0, 900));
        let mut offset = 0u32;
        b.iter(|| {
            for _ in 0..16 {
                offset = (offset + 13) % 500_000;
                list.push_event(ViewportEvent::scroll(offset));
            }
            list.on_frame();
            black_box(list.materialize(&items).count())
        })
    });

    group.bench_function("grid_resize", |b| {
        let mut grid = WindowedGrid::new(items.len(), row_height());
        let mut width = 320u32;
        b.iter(|| {
            width = if width > 1400 { 320 } else { width + 50 };
            grid.set_size(Size::new(width, 900));
            black_box(grid.materialize(&items).count())
        })
    });

    group.finish();
}

// ============================================================================
// Sorting
// ============================================================================

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    let by_price_name = SortConfig::new(SortField::asc("price")).then(SortField::asc("name"));
    let by_date = SortConfig::new(SortField::desc("updated"));

    for n in [1_000usize, 10_000] {
        let items = inventory(n);
        group.bench_with_input(BenchmarkId::new("price_then_name", n), &items, |b, items| {
            b.iter(|| black_box(apply_sort(items, &by_price_name)))
        });
        group.bench_with_input(BenchmarkId::new("date_indices", n), &items, |b, items| {
            b.iter(|| black_box(sort_indices(items, &by_date)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_range, bench_containers, bench_sort);
criterion_main!(benches);
