pub use enclose::*;

#[macro_export]
macro_rules! derived {
    (( $($d_tt:tt)* ) [ $($input:expr),* $(,)? ] => $($b:tt)*) => {
        rivulet::Derived::new(
            vec![$( rivulet::Input::from(&$input) ),*],
            $crate::macros::enclose!(($( $d_tt )*) Box::new(move || { $($b)* })),
        )
    };
    ([ $($input:expr),* $(,)? ] => $($b:tt)*) => {
        rivulet::Derived::new(
            vec![$( rivulet::Input::from(&$input) ),*],
            Box::new(move || { $($b)* }),
        )
    };
}

#[macro_export]
macro_rules! eager {
    (( $($d_tt:tt)* ) [ $($input:expr),* $(,)? ] => $($b:tt)*) => {{
        let mut builder = rivulet::Derived::build().eager();
        $( builder = builder.pull(rivulet::Input::from(&$input)); )*
        builder.compute($crate::macros::enclose!(($( $d_tt )*) move || { $($b)* }))
    }};
    ([ $($input:expr),* $(,)? ] => $($b:tt)*) => {{
        let mut builder = rivulet::Derived::build().eager();
        $( builder = builder.pull(rivulet::Input::from(&$input)); )*
        builder.compute(move || { $($b)* })
    }};
}
