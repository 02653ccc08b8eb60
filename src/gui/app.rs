use crate::config::{self, ColorOverrides, Config};
use crate::events::AppEvent;
use crate::gui::knob::{self, KnobState, PointerEvent, PointerKind};
use crate::gui::theme::{self, KnobColors};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

pub struct AppModel {
    pub state: Rc<RefCell<KnobState>>,
    pub overrides: Rc<RefCell<ColorOverrides>>,
    pub config_path: PathBuf,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Resize(i32, i32),
    Pointer(PointerEvent),
    ConfigReload,
    Close,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn apply_surface_size(&self) {
        let size = self.state.borrow().config.surface_size().ceil() as i32;
        self.drawing_area.set_content_width(size);
        self.drawing_area.set_content_height(size);
    }

    /// A new config means a new knob: rotation restarts, the center carries over
    /// until the next resize.
    fn remount(&mut self, config: Config) {
        let center = self.state.borrow().center;
        *self.state.borrow_mut() = KnobState::new(config.knob).with_center(center);
        *self.overrides.borrow_mut() = config.colors;
        self.apply_surface_size();
        self.drawing_area.queue_draw();
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, PathBuf, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Knob"),
            set_default_size: (320, 320),
            add_css_class: "knob-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gdk4::Key::Escape {
                        sender.input(AppMsg::Close);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_halign: gtk::Align::Center,
                set_valign: gtk::Align::Center,
                add_css_class: "knob-drawing-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(AppMsg::Pointer(PointerEvent::new(PointerKind::Down, x, y)));
                    },
                    // offsets are relative to where the drag started
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::Pointer(PointerEvent::new(
                                PointerKind::Move,
                                x + dx,
                                y + dy,
                            )));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, dx, dy| {
                        let (x, y) = gesture.start_point().unwrap_or_default();
                        sender.input(AppMsg::Pointer(PointerEvent::new(
                            PointerKind::Up,
                            x + dx,
                            y + dy,
                        )));
                    },
                    connect_cancel[sender] => move |_, _| {
                        sender.input(AppMsg::Pointer(PointerEvent::new(PointerKind::Cancel, 0.0, 0.0)));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, config_path, rx) = init;

        theme::load_css();

        let model = AppModel {
            state: Rc::new(RefCell::new(KnobState::new(config.knob))),
            overrides: Rc::new(RefCell::new(config.colors)),
            config_path,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.apply_surface_size();

        let state_draw = model.state.clone();
        let overrides_draw = model.overrides.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = KnobColors::from_context(&style_context, &overrides_draw.borrow());
                if let Err(e) = knob::draw(cr, &state_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Resize(width, height) => {
                if self
                    .state
                    .borrow_mut()
                    .layout(width as f64, height as f64)
                {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Pointer(event) => {
                let response = self.state.borrow_mut().handle_pointer(event);
                log::trace!(
                    "pointer {} at ({:.1}, {:.1}), consumed: {}",
                    event.kind,
                    event.position.x,
                    event.position.y,
                    response.consumed
                );
                if response.should_redraw {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::ConfigReload => match config::load_config(&self.config_path) {
                Ok(new_config) => {
                    self.remount(new_config);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Close => self.root.close(),
        }
    }
}
