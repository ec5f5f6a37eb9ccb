use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, Criterion};
use sejour_engine::draft::Inventory;
use sejour_engine::stay::Schedule;
use sejour_engine::{
    available_rooms, BookingDraft, DateRange, EngineConfig, GuestInfo, Room, StayInput, Tariff,
    TariffKind,
};

/// A draft holding one week-long stay per room, 200 rooms wide.
fn busy_draft() -> (Inventory, BookingDraft) {
    let rooms: Vec<Room> = (0..200)
        .map(|i| Room {
            id: i,
            code: i.to_string(),
            label: format!("Room {}", i),
            room_type_id: 1,
            functional: true,
        })
        .collect();
    let inventory = Inventory {
        rooms,
        tariffs: vec![Tariff {
            id: 1,
            code: "N".to_string(),
            label: "Nuitée".to_string(),
            kind: TariffKind::Nightly,
            details: Vec::new(),
        }],
    };

    let mut draft = BookingDraft::new(GuestInfo::default(), EngineConfig::default());
    let base = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
    for i in 0..200 {
        let start = base + Duration::days(i % 20);
        let input = StayInput::new(Schedule::nightly(start, start + Duration::days(7)), 1, 1)
            .with_rooms([i]);
        draft.add_stay(input, &inventory).unwrap();
    }
    (inventory, draft)
}

fn bench_available_rooms(c: &mut Criterion) {
    let (inventory, draft) = busy_draft();
    let base = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
    let range = DateRange::dates(base, base + Duration::days(3)).unwrap();

    c.bench_function("available_rooms_200", |b| {
        b.iter(|| available_rooms(&inventory.rooms, &draft, 1, &range, None).len())
    });

    c.bench_function("draft_conflicts_200", |b| b.iter(|| draft.conflicts().len()));
}

criterion_group!(benches, bench_available_rooms);
criterion_main!(benches);
