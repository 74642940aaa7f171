use std::{
    path::Path,
    sync::{
        mpsc::{self, channel},
        Arc, RwLock,
    },
    time::Duration,
};

use anyhow::Context;
use id_arena::{Arena, Id};
use naga::{
    back::wgsl::WriterFlags,
    valid::{Capabilities, ValidationFlags},
};
use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
};
use notify_debouncer_mini::{
    new_debouncer_opt, notify::*, DebounceEventResult, DebouncedEventKind, Debouncer,
};
use pollster::block_on;
use wgpu::{naga, PollType, RenderPipeline};

const SHADER_FOLDER: &str = "assets/shaders";
const SHARED_MODULES_FOLDER: &str = "assets/shaders/shared";

type PipelineFactory = Box<
    dyn Sync
        + Send
        + Fn(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
>;

#[derive(Debug, Clone)]
pub(crate) struct ShaderDefinition {
    pub name: &'static str,
    pub path: &'static str,
}

pub struct ShaderEntry {
    pipeline_id: PipelineId,
    def: ShaderDefinition,
    factory: PipelineFactory,
}

pub type PipelineId = Id<PipelineCacheEntry>;

#[derive(Default)]
pub struct PipelineCacheEntry(Option<wgpu::RenderPipeline>);

impl PipelineCacheEntry {
    pub fn set_pipeline(&mut self, pipeline: wgpu::RenderPipeline) {
        self.0 = Some(pipeline);
    }
}

pub struct PipelineCacheBuilder {
    shaders: Arena<ShaderEntry>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCacheBuilder {
    pub fn new() -> Self {
        Self {
            shaders: Arena::new(),
            pipelines: Arena::new(),
        }
    }

    pub fn add_shader(
        &mut self,
        shader_def: ShaderDefinition,
        factory: PipelineFactory,
    ) -> PipelineId {
        let pipeline_id = self.pipelines.alloc(PipelineCacheEntry::default());
        let _ = self.shaders.alloc(ShaderEntry {
            pipeline_id,
            def: shader_def,
            factory,
        });
        pipeline_id
    }

    pub fn build(self) -> PipelineCache {
        PipelineCache {
            shaders: Arc::new(self.shaders),
            pipelines: self.pipelines,
        }
    }
}

pub struct PipelineCache {
    shaders: Arc<Arena<ShaderEntry>>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCache {
    pub fn get(&self, id: PipelineId) -> &RenderPipeline {
        self.pipelines.get(id).unwrap().0.as_ref().unwrap()
    }

    pub fn get_entry_mut(&mut self, id: PipelineId) -> &mut PipelineCacheEntry {
        self.pipelines.get_mut(id).unwrap()
    }

    fn iter_shaders_and_pipelines_mut(
        &mut self,
    ) -> impl Iterator<Item = (&ShaderEntry, &mut PipelineCacheEntry)> {
        // The arenas stay in sync because add_shader inserts to both.
        self.shaders
            .iter()
            .map(|(_, shader_entry)| shader_entry)
            .zip(
                self.pipelines
                    .iter_mut()
                    .map(|(_, pipeline_entry)| pipeline_entry),
            )
    }
}

/// Compiles registered shaders to pipelines, and recompiles them when their
/// source files change on disk. Rebuilt pipelines are swapped in at the top
/// of the next frame; on a compile error the previous pipeline stays live.
pub(crate) struct ShaderLoader {
    pub cache: PipelineCache,
    device: wgpu::Device,
    receiver: mpsc::Receiver<(&'static str, PipelineId, wgpu::RenderPipeline)>,
    composer: Arc<RwLock<Composer>>,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl ShaderLoader {
    pub fn new(device: wgpu::Device, cache_builder: PipelineCacheBuilder) -> Self {
        let cache = cache_builder.build();

        let (send_new_pipelines, recv_new_pipelines) = channel();

        let device_loader = device.clone();

        let composer = create_composer().expect("Failed to create composer for shader loader");
        let composer = Arc::new(RwLock::new(composer));

        let shaders = cache.shaders.clone();
        let composer_clone = composer.clone();
        let mut debouncer = new_debouncer_opt(
            notify_debouncer_mini::Config::default().with_timeout(Duration::from_millis(100)),
            move |res: DebounceEventResult| match res {
                Ok(events) => {
                    for event in events {
                        if event.kind != DebouncedEventKind::Any {
                            continue;
                        }

                        let Some(entry) = shaders
                            .iter()
                            .find(|(_, entry)| event.path.ends_with(entry.def.path))
                            .map(|(_, entry)| entry)
                        else {
                            continue;
                        };

                        match compile_file(
                            &device_loader,
                            &entry.def,
                            &entry.factory,
                            composer_clone.clone(),
                        ) {
                            Ok(pipeline) => {
                                send_new_pipelines
                                    .send((entry.def.name, entry.pipeline_id, pipeline))
                                    .unwrap();
                            }
                            Err(e) => log::error!("Failed to reload shader: {:?}", e),
                        }
                    }
                }
                Err(e) => log::error!("Error debouncing shader changes: {}", e),
            },
        )
        .unwrap();

        let absolute_shader_folder = Path::new(SHADER_FOLDER).canonicalize().unwrap();

        debouncer
            .watcher()
            .watch(&absolute_shader_folder, RecursiveMode::Recursive)
            .unwrap();

        let mut shader_loader = Self {
            device,
            cache,
            receiver: recv_new_pipelines,
            composer,
            _debouncer: debouncer,
        };

        shader_loader
            .create_all_pipelines()
            .expect("Failed to create all pipelines");

        shader_loader
    }

    fn create_all_pipelines(&mut self) -> anyhow::Result<()> {
        let device = self.device.clone();
        let composer = self.composer.clone();

        for (shader, pipeline_entry) in self.cache.iter_shaders_and_pipelines_mut() {
            let pipeline = compile_file(&device, &shader.def, &shader.factory, composer.clone())
                .context(format!("Failed to compile shader: {}", shader.def.name))?;
            pipeline_entry.set_pipeline(pipeline);
        }

        Ok(())
    }

    pub(crate) fn load_pending_shaders(&mut self) -> anyhow::Result<()> {
        while let Ok((name, pipeline_id, pipeline)) = self.receiver.try_recv() {
            log::info!("Shader reloaded: {}", name);
            self.cache.get_entry_mut(pipeline_id).set_pipeline(pipeline);
        }

        Ok(())
    }
}

fn compile_file(
    device: &wgpu::Device,
    shader_def: &ShaderDefinition,
    factory: &PipelineFactory,
    composer: Arc<RwLock<Composer>>,
) -> anyhow::Result<wgpu::RenderPipeline> {
    let path = Path::new(SHADER_FOLDER).join(shader_def.path);
    let shader_code = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read shader file {}: {}", path.display(), e))?;

    let file_path = path.to_string_lossy().to_string();

    let mut composer = composer.write().unwrap();

    let module = composer
        .make_naga_module(NagaModuleDescriptor {
            file_path: &file_path,
            source: &shader_code,
            ..Default::default()
        })
        .context("Failed to create Naga module from shader code")?;

    // Validation proper is left to wgpu, this only produces the info the
    // WGSL writer needs.
    let validation_flags = ValidationFlags::empty();
    let info = naga::valid::Validator::new(validation_flags, Capabilities::all())
        .validate(&module)
        .context("Failed to validate Naga module")?;

    let shader_code = naga::back::wgsl::write_string(&module, &info, WriterFlags::empty())
        .context("Failed to convert Naga module to WGSL string")?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline = factory(device, shader_def, &shader_code);

    device
        .poll(PollType::Wait)
        .context("Failed to poll device after shader compilation.")?;

    let error = block_on(device.pop_error_scope());

    if let Some(error) = error {
        return Err(anyhow::anyhow!(
            "Shader compilation failed for {}: {}",
            shader_def.name,
            error
        ));
    };

    pipeline
}

fn create_composer() -> anyhow::Result<Composer> {
    let shared_files = std::fs::read_dir(SHARED_MODULES_FOLDER)
        .context("Failed to read shared shader modules directory")?;
    let mut composer = Composer::default();

    for entry in shared_files {
        let entry = entry.context("Failed to read entry in shared shader modules directory")?;
        let path = entry.path();

        if !path.is_file() || path.extension().map_or(true, |ext| ext != "wgsl") {
            continue;
        }

        let source = std::fs::read_to_string(&path).context("Failed to read shared shader module")?;

        let file_path = path.to_string_lossy().to_string();

        composer
            .add_composable_module(ComposableModuleDescriptor {
                source: &source,
                file_path: &file_path,
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .context(format!("Failed to add shared shader module: {}", file_path))?;
    }

    Ok(composer)
}
