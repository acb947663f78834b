use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use std::sync::Arc;

use storefront_core::{AggregateId, CustomerId};
use storefront_events::InMemoryEventBus;
use storefront_infra::command_handler::{OrderCommandHandler, OrderMessage};
use storefront_infra::order_store::InMemoryOrderStore;
use storefront_sales::{AddOrderItem, ProductId};

fn setup_pipeline(
) -> OrderCommandHandler<Arc<InMemoryOrderStore>, Arc<InMemoryEventBus<OrderMessage>>> {
    let store = Arc::new(InMemoryOrderStore::new());
    let bus: Arc<InMemoryEventBus<OrderMessage>> = Arc::new(InMemoryEventBus::new());
    OrderCommandHandler::new(store, bus)
}

fn add_item(customer_id: CustomerId, product_id: ProductId, quantity: u32) -> AddOrderItem {
    AddOrderItem {
        customer_id,
        product_id,
        product_name: "Bench Product".to_string(),
        quantity,
        unit_price: 1_000,
    }
}

// Each iteration runs against a pipeline built in the batch setup, so the
// draft lookup always scans a store of the same size.
fn bench_add_item_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_item_latency");
    group.sample_size(1000);

    // Benchmark: first add for a customer (starts and inserts a fresh draft)
    group.bench_function("fresh_draft", |b| {
        b.iter_batched(
            || {
                let customer = CustomerId::new();
                let product = ProductId::new(AggregateId::new());
                (setup_pipeline(), add_item(customer, product, 2))
            },
            |(handler, command)| black_box(handler.handle_add_item(command)),
            BatchSize::SmallInput,
        );
    });

    // Benchmark: second add of the same product (loads the stored draft and
    // merges quantities under the per-product ceiling)
    group.bench_function("draft_then_merge", |b| {
        b.iter_batched(
            || {
                let handler = setup_pipeline();
                let customer = CustomerId::new();
                let product = ProductId::new(AggregateId::new());
                handler.handle_add_item(add_item(customer, product, 4));
                (handler, add_item(customer, product, 6))
            },
            |(handler, command)| black_box(handler.handle_add_item(command)),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_add_item_latency);
criterion_main!(benches);
