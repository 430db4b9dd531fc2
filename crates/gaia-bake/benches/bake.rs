use criterion::{Criterion, black_box, criterion_group, criterion_main};

use gaia_bake::shapes::{cone, icosphere};
use gaia_bake::{BakeOptions, MeshBaker, MeshRole, MorphTarget, NormalMode, SourceMesh};
use gaia_geom::Vec3;
use gaia_mask::{MaskParams, MorphTargetIndexMap, Region, SliderVector, TerrainField};

fn planet(subdivisions: u32) -> SourceMesh {
    let (pos, idx) = icosphere(subdivisions, 1.0);
    let names = ["Ocean_Flatten", "Desert_Dunes", "Volcano_Peaks", "Forest_Hills"];
    let mut mesh = SourceMesh::new(
        "planet",
        pos.clone(),
        Some(idx),
        MeshRole::Terrain {
            map: MorphTargetIndexMap::discover(&names),
        },
    );
    for (k, name) in names.iter().enumerate() {
        mesh.morph_targets.push(MorphTarget {
            name: name.to_string(),
            offsets: pos.iter().map(|c| c * 0.02 * (k + 1) as f32).collect(),
        });
    }
    mesh
}

fn foliage(count: usize) -> SourceMesh {
    let (pos, _) = icosphere(3, 1.0);
    let pos: Vec<f32> = pos
        .chunks_exact(3)
        .take(count)
        .flat_map(|v| {
            let dir = Vec3::new(v[0], v[1], v[2]);
            cone(dir, dir, 0.02, 0.05, 5)
        })
        .flat_map(|p| p.to_array())
        .collect();
    SourceMesh::new("foliage", pos, None, MeshRole::Overlay { region: Region::Forest })
}

fn field() -> TerrainField {
    TerrainField::new(
        &SliderVector::new([80.0, 70.0, 50.0, 50.0, 50.0]),
        MaskParams::default(),
    )
}

fn bench_bake_planet(c: &mut Criterion) {
    let mut group = c.benchmark_group("bake_planet");
    let f = field();
    for subdiv in [3u32, 4] {
        let meshes = [planet(subdiv)];
        group.bench_function(format!("icosphere_{subdiv}_flat"), |b| {
            let baker = MeshBaker::default();
            b.iter(|| black_box(baker.bake(&meshes, &f)))
        });
    }
    let meshes = [planet(4)];
    group.bench_function("icosphere_4_smooth", |b| {
        let baker = MeshBaker::new(BakeOptions {
            normals: NormalMode::Smooth,
            ..BakeOptions::default()
        });
        b.iter(|| black_box(baker.bake(&meshes, &f)))
    });
    group.finish();
}

fn bench_bake_foliage(c: &mut Criterion) {
    let mut group = c.benchmark_group("bake_foliage");
    let f = field();
    let meshes = [planet(3), foliage(500)];
    group.bench_function("planet_plus_500_cones", |b| {
        let baker = MeshBaker::default();
        b.iter(|| black_box(baker.bake(&meshes, &f)))
    });
    group.finish();
}

criterion_group!(benches, bench_bake_planet, bench_bake_foliage);
criterion_main!(benches);
