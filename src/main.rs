use scene_ngin::{app, scene::SceneConfig};

fn main() -> anyhow::Result<()> {
    app::run(SceneConfig::default())
}
