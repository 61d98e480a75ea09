use std::sync::Arc;

use flexinject::prelude::*;

fn main() {
    let registry = Registry::new();
    configure(&registry, "greeter");

    let app = inject::<Arc<App>>().from(&registry).resolve_or_panic();
    app.run();

    let audit = app.audit.get().expect("the logger should be alive");
    audit.log("Done.");

    registry.remove_all();
}

fn configure(registry: &Registry, app_name: &'static str) {
    registry.register("app_name", move || app_name);

    registry.register_type({
        let registry = registry.clone();
        move || -> Arc<dyn Logger> {
            let app_name = inject::<&'static str>()
                .from(&registry)
                .named("app_name")
                .resolve_or_panic();
            Arc::new(ConsoleLogger {
                app_name: app_name.into_inner(),
            })
        }
    });

    registry.register(GreeterKind::English.key(), {
        let registry = registry.clone();
        move || -> Arc<dyn Greeter> {
            Arc::new(EnglishGreeter {
                logger: inject().from(&registry).resolve_or_panic(),
            })
        }
    });

    registry.register(GreeterKind::Chinese.key(), {
        let registry = registry.clone();
        move || -> Arc<dyn Greeter> {
            Arc::new(ChineseGreeter {
                logger: inject().from(&registry).lazy(),
            })
        }
    });

    registry.register_type({
        let registry = registry.clone();
        move || {
            Arc::new(App {
                logger: inject().from(&registry).resolve_or_panic(),
                audit: inject::<Arc<dyn Logger>>()
                    .from(&registry)
                    .weak()
                    .expect("the logger should be registered"),
                greeters: [GreeterKind::English, GreeterKind::Chinese]
                    .into_iter()
                    .map(|kind| {
                        inject()
                            .from(&registry)
                            .named(kind.key())
                            .mode(ResolveMode::New)
                            .resolve_or_panic()
                    })
                    .collect(),
            })
        }
    });
}

trait Logger: Send + Sync + 'static {
    fn log(&self, message: &str);
}

struct ConsoleLogger {
    app_name: &'static str,
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        eprintln!("[{}] {}", self.app_name, message);
    }
}

trait Greeter: Send + Sync + 'static {
    fn greet(&self);
}

struct EnglishGreeter {
    logger: Inject<Arc<dyn Logger>>,
}

impl Greeter for EnglishGreeter {
    fn greet(&self) {
        self.logger.log("Hello World!");
    }
}

struct ChineseGreeter {
    logger: LazyInject<Arc<dyn Logger>>,
}

impl Greeter for ChineseGreeter {
    fn greet(&self) {
        self.logger.value().log("你好世界!");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GreeterKind {
    English,
    Chinese,
}

impl GreeterKind {
    fn key(self) -> key::Key {
        match self {
            Self::English => key::named("greeter.english"),
            Self::Chinese => key::named("greeter.chinese"),
        }
    }
}

struct App {
    logger: Inject<Arc<dyn Logger>>,
    audit: WeakInject<dyn Logger>,
    greeters: Vec<Inject<Arc<dyn Greeter>>>,
}

impl App {
    fn run(&self) {
        self.logger.log("Greeting from flexinject managed objects:");
        for greeter in &self.greeters {
            greeter.greet();
        }
    }
}
