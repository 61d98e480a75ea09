use std::sync::Arc;

use flexinject::{Registry, ResolveError, ResolveMode};

pub struct Connection {
    pub port: u16,
}

fn main() -> Result<(), ResolveError> {
    flexinject::register("answer", || 42u64);
    flexinject::register_type(|| Arc::new(Registry::new()));
    flexinject::register_type(|| Connection { port: 5432 });

    let answer: u64 = flexinject::resolve("answer", ResolveMode::New)?;
    let nested = flexinject::resolve_type::<Arc<Registry>>(ResolveMode::Shared)?;
    let connection: Connection = flexinject::resolve_new_type()?;
    let by_key = flexinject::resolve_new::<Connection>(flexinject::key::of::<Connection>())?;
    assert_eq!(answer, 42);
    assert_eq!(connection.port, by_key.port);
    assert!(!nested.ptr_eq(flexinject::shared()));

    flexinject::remove("answer");
    flexinject::remove_type::<Arc<Registry>>();
    flexinject::remove_all();
    Ok(())
}
