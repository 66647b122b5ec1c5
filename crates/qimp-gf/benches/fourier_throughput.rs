use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_complex::Complex64;
use qimp_core::{BlockStructure, FrequencyTimeGrid};
use qimp_gf::GfContainer;

fn sample_g_tau() -> GfContainer {
    let structure = BlockStructure::spin_orbitals(&["up", "dn"], 2).unwrap();
    let grid = FrequencyTimeGrid::new(10.0, 1024, 128, 16).unwrap();
    GfContainer::diagonal_from_times(&structure, &grid, |_, index, tau| {
        let eps = 0.7 + index as f64;
        Complex64::new(-(-eps * tau).exp() / (1.0 + (-10.0 * eps).exp()), 0.0)
    })
}

fn bench_fourier(c: &mut Criterion) {
    let g_tau = sample_g_tau();
    c.bench_function("tau_to_matsubara_2x2_1024", |b| {
        b.iter(|| black_box(&g_tau).to_matsubara().unwrap())
    });
}

criterion_group!(benches, bench_fourier);
criterion_main!(benches);
