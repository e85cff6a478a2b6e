//! Whole-lifecycle checks against the recording device.
use prism_core::{transform, Color, ImageBuffer, Mesh};
use prism_gpu::headless::{
    Event, HeadlessConfig, HeadlessDevice, HeadlessShader, ResourceKind, SharedLedger, TargetId,
};
use prism_gpu::{
    Extent, GpuBuffer, GpuDevice, GpuTexture, IndexFormat, SampleCount, ShaderDesc, ShaderFormat,
    ShaderStage,
};
use prism_renderer::{
    DrawStats, FrameOutcome, FrameRenderer, RenderError, Renderer, ResourceSetDesc, ShaderPair,
    SurfaceState,
};

const DESC: ResourceSetDesc<'static> =
    ResourceSetDesc { sample_count: SampleCount::X4, texture_label: "checker.png" };

fn shaders(device: &HeadlessDevice) -> ShaderPair<HeadlessShader> {
    let make = |label, stage, resources| {
        device
            .create_shader(&ShaderDesc {
                label,
                code: b"bytecode",
                entry_point: "main",
                format: ShaderFormat::Spirv,
                stage,
                resources,
            })
            .unwrap()
    };
    ShaderPair::new(
        make("TexturedQuadWithMatrix.vert", ShaderStage::Vertex, prism_renderer::pipeline::VERTEX_SHADER_RESOURCES),
        make("TexturedQuad.frag", ShaderStage::Fragment, prism_renderer::pipeline::FRAGMENT_SHADER_RESOURCES),
    )
}

fn checkerboard() -> ImageBuffer {
    let (w, b) = ([255u8, 255, 255, 255], [0u8, 0, 0, 255]);
    ImageBuffer::from_rgba8(2, 2, [w, b, b, w].concat()).unwrap()
}

fn quad_renderer(device: HeadlessDevice) -> (Renderer<HeadlessDevice>, SharedLedger) {
    let ledger = device.ledger();
    let shaders = shaders(&device);
    let renderer = Renderer::new(device, shaders, &Mesh::quad(), checkerboard(), &DESC, FrameRenderer::default())
        .unwrap();
    (renderer, ledger)
}

fn frame_events(ledger: &SharedLedger) -> Vec<Event> {
    let ledger = ledger.borrow();
    let start = ledger
        .events()
        .iter()
        .rposition(|e| matches!(e, Event::CommandsAcquired { label } if label == "Frame"))
        .unwrap();
    ledger.events()[start..].to_vec()
}

#[test]
fn quad_with_checkerboard_draws_six_indices_once() {
    let (mut renderer, ledger) = quad_renderer(HeadlessDevice::default());

    let set = renderer.resources();
    assert_eq!(set.vertex_buffer().size(), 4 * 20);
    assert_eq!(set.index_buffer().size(), 6 * 4);
    assert_eq!((set.texture().width(), set.texture().height()), (2, 2));

    let outcome = renderer.render(0).unwrap();
    assert_eq!(
        outcome,
        FrameOutcome::Drawn(DrawStats { target: Extent::new(800, 600), index_count: 6, instance_count: 1 })
    );
    let draws = ledger.borrow().count(|e| {
        matches!(
            e,
            Event::DrawIndexed { index_count: 6, instance_count: 1, first_index: 0, vertex_offset: 0, first_instance: 0 }
        )
    });
    assert_eq!(draws, 1);
}

#[test]
fn frame_protocol_order() {
    let (mut renderer, ledger) = quad_renderer(HeadlessDevice::default());
    renderer.render(1_000).unwrap();

    let set = renderer.resources();
    let msaa = set.target().color_texture().unwrap().id();
    let depth = set.target().depth_texture().unwrap().id();
    let events = frame_events(&ledger);
    let mvp = transform::model_view_projection(800, 600, 1_000);
    let expected = vec![
        Event::CommandsAcquired { label: "Frame".into() },
        Event::SwapchainAcquired { image: Some(Extent::new(800, 600)) },
        Event::RenderPassBegin {
            color: TargetId::Texture(msaa),
            resolve: Some(TargetId::Swapchain),
            depth: Some(depth),
            clear_color: Some(Color::CHARCOAL),
            clear_depth: Some(1.0),
        },
        Event::BindPipeline(set.pipeline().id()),
        Event::BindVertexBuffer { slot: 0, buffer: set.vertex_buffer().id(), offset: 0 },
        Event::BindIndexBuffer { buffer: set.index_buffer().id(), format: IndexFormat::Uint32, offset: 0 },
        Event::BindFragmentSamplers { first_slot: 0, pairs: vec![(set.texture().id(), set.sampler().id())] },
        Event::PushVertexUniform { slot: 0, data: bytemuck::cast_slice::<f32, u8>(&mvp.to_cols_array()).to_vec() },
        Event::DrawIndexed { index_count: 6, instance_count: 1, first_index: 0, vertex_offset: 0, first_instance: 0 },
        Event::RenderPassEnd,
        Event::Submitted { label: "Frame".into(), presented: true },
    ];
    assert_eq!(events, expected);
}

#[test]
fn resize_recreates_each_attachment_once() {
    let (mut renderer, ledger) = quad_renderer(HeadlessDevice::default());
    let msaa = ledger.borrow().created_with_label("MSAA Texture");
    let depth = ledger.borrow().created_with_label("Depth Stencil Texture");
    assert_eq!((msaa.len(), depth.len()), (1, 1));

    assert!(renderer.resize(1024, 768).unwrap());

    {
        let ledger = ledger.borrow();
        assert_eq!(ledger.released(msaa[0]), 1);
        assert_eq!(ledger.released(depth[0]), 1);
        assert_eq!(ledger.created_with_label("MSAA Texture").len(), 2);
        assert_eq!(ledger.created_with_label("Depth Stencil Texture").len(), 2);
        assert!(ledger.events().contains(&Event::SwapchainResized(Extent::new(1024, 768))));
    }

    let target = renderer.resources().target();
    for texture in [target.color_texture().unwrap(), target.depth_texture().unwrap()] {
        assert_eq!((texture.width(), texture.height()), (1024, 768));
    }
    match renderer.render(16).unwrap() {
        FrameOutcome::Drawn(stats) => assert_eq!(stats.target, Extent::new(1024, 768)),
        other => panic!("expected a drawn frame, got {other:?}"),
    }
}

#[test]
fn aspect_ratio_follows_resize() {
    let (mut renderer, ledger) = quad_renderer(HeadlessDevice::default());
    renderer.resize(1024, 512).unwrap();
    renderer.render(250).unwrap();

    let pushed = frame_events(&ledger)
        .into_iter()
        .find_map(|e| match e {
            Event::PushVertexUniform { data, .. } => Some(data),
            _ => None,
        })
        .unwrap();
    let expected = transform::model_view_projection(1024, 512, 250);
    assert_eq!(pushed, bytemuck::cast_slice::<f32, u8>(&expected.to_cols_array()));
    let stale = transform::model_view_projection(800, 600, 250);
    assert_ne!(pushed, bytemuck::cast_slice::<f32, u8>(&stale.to_cols_array()));
}

#[test]
fn no_swapchain_image_still_submits() {
    let device = HeadlessDevice::default();
    let switch = device.swapchain_switch();
    let (mut renderer, ledger) = quad_renderer(device);

    switch.set(false);
    assert_eq!(renderer.render(0).unwrap(), FrameOutcome::NoSwapchainImage);
    assert_eq!(
        frame_events(&ledger),
        vec![
            Event::CommandsAcquired { label: "Frame".into() },
            Event::SwapchainAcquired { image: None },
            Event::Submitted { label: "Frame".into(), presented: false },
        ]
    );

    switch.set(true);
    assert!(matches!(renderer.render(0).unwrap(), FrameOutcome::Drawn(_)));
}

#[test]
fn minimized_window_skips_frames_until_restored() {
    let (mut renderer, ledger) = quad_renderer(HeadlessDevice::default());
    let before = ledger.borrow().events().len();

    assert!(!renderer.resize(0, 0).unwrap());
    assert_eq!(renderer.resources().target().state(), SurfaceState::Minimized);
    assert_eq!(renderer.render(10).unwrap(), FrameOutcome::Minimized);
    // neither the swapchain nor the attachments were touched
    assert_eq!(ledger.borrow().events().len(), before);

    assert!(renderer.resize(640, 360).unwrap());
    match renderer.render(20).unwrap() {
        FrameOutcome::Drawn(stats) => assert_eq!(stats.target, Extent::new(640, 360)),
        other => panic!("expected a drawn frame, got {other:?}"),
    }
}

#[test]
fn repeated_resizes_never_leak() {
    let (mut renderer, ledger) = quad_renderer(HeadlessDevice::default());
    for (w, h) in [(1, 1), (1920, 1080), (0, 10), (333, 777), (333, 777), (800, 600)] {
        renderer.resize(w, h).unwrap();
        assert_eq!(ledger.borrow().live_count(ResourceKind::Texture), 3);
    }
    let ledger = ledger.borrow();
    for id in ledger.created_with_label("MSAA Texture") {
        assert!(ledger.released(id) <= 1);
    }
}

#[test]
fn single_sample_draws_straight_to_swapchain() {
    let device = HeadlessDevice::default();
    let ledger = device.ledger();
    let shaders = shaders(&device);
    let desc = ResourceSetDesc { sample_count: SampleCount::X1, ..DESC };
    let black = Color::rgb(0.0, 0.0, 0.0);
    let mut renderer =
        Renderer::new(device, shaders, &Mesh::quad(), checkerboard(), &desc, FrameRenderer::new(black)).unwrap();

    assert!(ledger.borrow().created_with_label("MSAA Texture").is_empty());
    renderer.render(0).unwrap();
    let begin = frame_events(&ledger)
        .into_iter()
        .find(|e| matches!(e, Event::RenderPassBegin { .. }))
        .unwrap();
    assert!(matches!(
        begin,
        Event::RenderPassBegin { color: TargetId::Swapchain, resolve: None, clear_color: Some(c), .. } if c == black
    ));
}

#[test]
fn submission_failure_is_reported() {
    let device = HeadlessDevice::default();
    let ledger = device.ledger();
    let shaders = shaders(&device);
    let mut renderer =
        Renderer::new(device, shaders, &Mesh::quad(), checkerboard(), &DESC, FrameRenderer::default()).unwrap();

    renderer.device().fail_submission(true);
    assert!(matches!(renderer.render(0), Err(RenderError::Gpu(_))));
    drop(renderer);
    assert_eq!(ledger.borrow().live_total(), 0);
}

#[test]
fn pipeline_rejection_fails_creation() {
    let device = HeadlessDevice::default();
    device.fail_pipeline_creation(true);
    let ledger = device.ledger();
    let shaders = shaders(&device);
    let result = Renderer::new(device, shaders, &Mesh::quad(), checkerboard(), &DESC, FrameRenderer::default());
    assert!(matches!(result, Err(RenderError::Gpu(_))));
    assert_eq!(ledger.borrow().live_total(), 0);
}

#[test]
fn teardown_waits_for_idle_before_releasing() {
    let (mut renderer, ledger) = quad_renderer(HeadlessDevice::new(HeadlessConfig {
        swapchain_size: Extent::new(320, 240),
        ..Default::default()
    }));
    renderer.render(5).unwrap();
    ledger.borrow_mut().clear_events();

    drop(renderer);

    let ledger = ledger.borrow();
    assert_eq!(ledger.events().first(), Some(&Event::WaitIdle));
    assert_eq!(ledger.count(|e| matches!(e, Event::WaitIdle)), 1);
    assert_eq!(ledger.count(|e| matches!(e, Event::Released { .. })), 7);
    assert_eq!(ledger.live_total(), 0);
    let last = ledger.events().last().unwrap();
    assert!(matches!(last, Event::Released { kind: ResourceKind::Pipeline, .. }));
}

#[test]
fn zero_sized_window_at_startup_starts_minimized() {
    let (mut renderer, ledger) = quad_renderer(HeadlessDevice::new(HeadlessConfig {
        swapchain_size: Extent::new(0, 0),
        ..Default::default()
    }));

    assert_eq!(renderer.resources().target().state(), SurfaceState::Minimized);
    assert!(ledger.borrow().created_with_label("MSAA Texture").is_empty());
    assert!(ledger.borrow().created_with_label("Depth Stencil Texture").is_empty());
    assert_eq!(renderer.render(0).unwrap(), FrameOutcome::Minimized);

    assert!(renderer.resize(800, 600).unwrap());
    let color = renderer.resources().target().color_texture().unwrap();
    assert_eq!((color.width(), color.height()), (800, 600));
    assert!(matches!(renderer.render(0).unwrap(), FrameOutcome::Drawn(_)));
}
