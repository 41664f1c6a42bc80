use crate::driver::{Driver, ObjectKind};
use crate::handle::Handle;
use crate::resource::{OwnedHandle, Resource};
use crate::state::StateCache;
use crate::types::ShaderStages;

/// A program pipeline object, combining separable programs per stage.
#[derive(Debug)]
pub struct ProgramPipeline<'d> {
    owned: OwnedHandle<'d>,
    stages: ShaderStages,
}

impl<'d> ProgramPipeline<'d> {
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self {
            owned: OwnedHandle::empty(driver, ObjectKind::ProgramPipeline),
            stages: ShaderStages::empty(),
        }
    }

    pub fn allocated(driver: &'d dyn Driver) -> Self {
        let mut pipeline = Self::new(driver);
        pipeline.create(());
        pipeline
    }

    pub fn take(&mut self) -> Self {
        Self {
            owned: self.owned.take(),
            stages: std::mem::replace(&mut self.stages, ShaderStages::empty()),
        }
    }

    pub fn bind(&self, cache: &mut StateCache<'_>) {
        cache.bind_pipeline(self);
    }

    /// Uses `program` for every stage in `stages`.
    ///
    /// Passing [`Handle::NONE`] as the program detaches those stages.
    pub fn use_stages(&mut self, stages: impl Into<ShaderStages>, program: impl Into<Handle>) {
        let stages = stages.into();
        let program = program.into();
        self.owned
            .driver()
            .use_program_stages(self.handle(), stages, program);

        if program.is_valid() {
            self.stages.insert(stages);
        } else {
            self.stages.remove(stages);
        }
    }

    /// Stages that currently have a program attached through
    /// [`use_stages`](Self::use_stages).
    pub fn stages(&self) -> ShaderStages {
        self.stages
    }
}

impl Resource for ProgramPipeline<'_> {
    type Description<'a> = ();

    const KIND: ObjectKind = ObjectKind::ProgramPipeline;

    fn create(&mut self, _desc: ()) {
        self.owned.allocate();
    }

    fn destroy(&mut self) {
        self.owned.release();
        self.stages = ShaderStages::empty();
    }

    #[inline]
    fn handle(&self) -> Handle {
        self.owned.handle()
    }
}

impl From<&ProgramPipeline<'_>> for Handle {
    fn from(pipeline: &ProgramPipeline<'_>) -> Self {
        pipeline.handle()
    }
}
