use criterion::{criterion_group, criterion_main, Criterion};
use refl_info::{angle_info, MagneticUnderlayerInfo};
use refl_model::library::many_param_sample;
use refl_model::SampleYig;
use refl_sim::{AngleTime, Conditions, DirectBeam};

fn bench_fisher(c: &mut Criterion) {
    let beam = DirectBeam::offspec();
    let plan = [AngleTime::new(0.7, 100, 10.0), AngleTime::new(2.0, 100, 40.0)];
    let sample = many_param_sample().expect("sample");
    c.bench_function("angle_info_ten_parameters", |b| {
        b.iter(|| {
            let _ = angle_info(&sample, &plan, Conditions::default(), &beam).expect("info");
        });
    });

    let yig = SampleYig::new();
    c.bench_function("pt_mag_underlayer_info", |b| {
        b.iter(|| {
            let _ = yig
                .underlayer_info(&plan, 713.8, 21.08, &beam)
                .expect("info");
        });
    });
}

criterion_group!(benches, bench_fisher);
criterion_main!(benches);
