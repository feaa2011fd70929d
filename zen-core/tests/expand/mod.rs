mod css;
mod html;
mod wrap;
