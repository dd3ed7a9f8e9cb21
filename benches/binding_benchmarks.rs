use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use phoneodeo_dir::{BindingController, ComponentRegistry, PhoneodeoDir, PlatformDevice};

pub fn criterion_benchmark(c: &mut Criterion) {
    let dev = PlatformDevice::new("spdif-in.0").with_compatible(PhoneodeoDir::COMPATIBLE);

    c.bench_function("PhoneodeoDir::component()", |b| {
        b.iter(|| PhoneodeoDir::component(black_box(&dev)))
    });

    c.bench_function("bind + unbind", |b| {
        let host = Arc::new(ComponentRegistry::new());
        let mut ctl = BindingController::new(PhoneodeoDir, host);

        b.iter(|| {
            let _ = ctl.device_added(black_box(&dev));
            ctl.device_removed(dev.id())
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
